use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::uploads::UploadError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Request failures, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No audio file provided")]
    MissingAudio,
    #[error("No file selected")]
    EmptyFilename,
    #[error("File too large")]
    TooLarge,
    #[error("Invalid multipart body")]
    InvalidMultipart,
    #[error("Not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAudio | ApiError::EmptyFilename | ApiError::InvalidMultipart => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(detail, "internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(ErrorBody { error: message })).into_response()
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge => ApiError::TooLarge,
            UploadError::Stream(_) => ApiError::InvalidMultipart,
            UploadError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        upload_error_from_multipart(err).into()
    }
}

/// Body limit hits surface as 413 from the multipart parser.
pub fn upload_error_from_multipart(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::Stream(err.body_text())
    }
}

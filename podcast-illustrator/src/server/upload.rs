use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use futures::TryStreamExt;
use serde::Serialize;

use crate::uploads::JobId;

use super::AppState;
use super::error::{ApiError, upload_error_from_multipart};

const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: JobId,
    pub filename: String,
    pub file_size: u64,
    pub status: &'static str,
    pub message: &'static str,
}

/// `POST /api/upload` — accept one audio file and assign it a job.
///
/// Only parts that carry a filename count as files; the first file part
/// named `audio` is stored and everything else is skipped.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    // Not a multipart request at all, so there can be no file part
    let mut multipart = multipart.map_err(|_| ApiError::MissingAudio)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }

        let job_id = JobId::new();
        let body = field.map_err(upload_error_from_multipart);
        let stored = state.uploads.store(job_id, &filename, body).await?;

        tracing::info!(
            job_id = %job_id,
            filename,
            size = stored.size,
            path = %stored.path.display(),
            "upload stored"
        );

        return Ok(Json(UploadResponse {
            job_id: stored.job_id,
            filename,
            file_size: stored.size,
            status: "uploaded",
            message: "File uploaded successfully - processing will be implemented",
        }));
    }

    Err(ApiError::MissingAudio)
}

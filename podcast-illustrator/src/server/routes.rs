use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::AppState;
use super::error::ApiError;

pub const SERVICE_NAME: &str = "podcast-illustrator";

#[derive(Serialize)]
pub struct IndexResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub platform: String,
    pub version: &'static str,
}

/// `GET /`
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "healthy",
        service: SERVICE_NAME,
        message: "Railway deployment successful!",
    })
}

/// `GET /api/health` — liveness probe for the hosting platform.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        platform: state.config.platform.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

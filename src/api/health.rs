use axum::{http::StatusCode, response::IntoResponse};

/// GET /api/v1/healthz - liveness probe
pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

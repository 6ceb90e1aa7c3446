use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;

use crate::error::AppError;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

/// Fallback for a known path hit with the wrong verb.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Treats a missing, empty or whitespace-only string as absent.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

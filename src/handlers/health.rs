//! Health check endpoint for service monitoring.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Health check handler.
///
/// Always answers 200. The store is deliberately not touched, so this
/// reports process liveness only.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "OK",
///   "message": "QR code API is running"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "QR code API is running".to_string(),
    })
}

//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Infrastructure Errors**: database failures and QR encoding failures (500)
/// - **Resource Errors**: no token stored for the requested user (404)
/// - **Validation Errors**: missing or malformed request data (400)
///
/// An invalid or already-redeemed token is NOT an error. Verification reports
/// it as `valid: false` so callers cannot probe which users hold tokens.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No token row exists for the requested user.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("QR code not found")]
    NotFound,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// The payload could not be rendered to a PNG.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("QR code encoding failed: {0}")]
    QrEncoding(String),
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::QrEncoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to show to API clients.
    ///
    /// Server-side failures collapse to a generic message; the detail only
    /// goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidRequest(msg) => msg.clone(),
            AppError::NotFound => self.to_string(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::QrEncoding(_) => "Failed to generate QR code".to_string(),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `NotFound` → 404 Not Found
/// - `InvalidRequest` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
/// - `QrEncoding` → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match self {
            AppError::NotFound => "not_found",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Database(_) => "internal_error",
            AppError::QrEncoding(_) => "qr_encoding_failed",
        };

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.public_message()
            }
        }));

        (status, body).into_response()
    }
}

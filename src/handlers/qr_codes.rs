//! QR code HTTP handlers.
//!
//! This module implements the QR-related API endpoints:
//! - POST /api/qr-code/generate - Issue a token and return it as a PNG
//! - POST /api/qr-code/verify - Redeem a scanned payload

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    app::AppState,
    error::AppError,
    models::qr_code::{GenerateRequest, VerifyRequest, VerifyResponse},
    services::qr_service,
};

const INVALID_QR_CODE: &str = "Invalid QR code";

/// Generate a QR code for a user.
///
/// # Endpoint
///
/// `POST /api/qr-code/generate`
///
/// # Request Body
///
/// ```json
/// { "user_id": "alice" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `image/png` body encoding `alice:<token>`
/// - **Error (400)**: body is not JSON, or `user_id` is missing/invalid
/// - **Error (500)**: database or encoding failure
///
/// Any token previously issued to the same user stops verifying.
pub async fn generate_qr_code(
    State(state): State<AppState>,
    request: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    // Every body problem is a 400, including a missing content type
    let Json(request) =
        request.map_err(|e| AppError::InvalidRequest(format!("Malformed request body: {e}")))?;

    let png =
        qr_service::issue_qr_code(state.store.as_ref(), &request.user_id, state.qr_image_size)
            .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Verify and redeem a scanned QR payload.
///
/// # Endpoint
///
/// `POST /api/qr-code/verify`
///
/// # Request Body
///
/// ```json
/// { "qr_data": "alice:X7fQ2mZ9pL" }
/// ```
///
/// # Response
///
/// Always `{"valid": bool, "message": string}`.
///
/// - **200, valid=true**: token redeemed; `message` echoes `qr_data`
/// - **200, valid=false**: malformed payload, unknown user, wrong or used token
/// - **400, valid=false**: body is not JSON or `qr_data` is missing
/// - **500, valid=false**: database failure
pub async fn verify_qr_code(
    State(state): State<AppState>,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> (StatusCode, Json<VerifyResponse>) {
    let Json(request) = match request {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(VerifyResponse::invalid(format!("Malformed request body: {e}"))),
            );
        }
    };

    match qr_service::redeem_qr_code(state.store.as_ref(), &request.qr_data).await {
        Ok(true) => (StatusCode::OK, Json(VerifyResponse::valid(request.qr_data))),
        Ok(false) => (StatusCode::OK, Json(VerifyResponse::invalid(INVALID_QR_CODE))),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(error = %e, "QR verification failed");
            }
            (status, Json(VerifyResponse::invalid(e.public_message())))
        }
    }
}

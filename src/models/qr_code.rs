//! Redemption token data models and API request/response types.
//!
//! This module defines:
//! - `QrCode`: Database entity holding a user's current token
//! - `TokenStatus`: Two-state redemption flag
//! - Request and response bodies for the generate and verify endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Redemption state of a token.
///
/// Stored as an `INTEGER` column: `0` = unredeemed, `1` = redeemed.
/// The only transition is `Unredeemed -> Redeemed`, and it is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Unredeemed = 0,
    Redeemed = 1,
}

/// Represents a row of the `qr_codes` table.
///
/// There is at most one row per `user_id`; issuing a new token overwrites it.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct QrCode {
    /// User the token was issued to (primary key)
    pub user_id: String,

    /// The 10-character token embedded in the QR payload
    pub random_string: String,

    pub status: TokenStatus,

    /// When the row was first created
    ///
    /// Whether this survives an overwrite depends on `CreatedAtPolicy`.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every overwrite and on redemption
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/qr-code/generate`.
///
/// ```json
/// { "user_id": "alice" }
/// ```
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Missing and empty are both rejected by the handler
    #[serde(default)]
    pub user_id: String,
}

/// Request body for `POST /api/qr-code/verify`.
///
/// ```json
/// { "qr_data": "alice:X7fQ2mZ9pL" }
/// ```
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub qr_data: String,
}

/// Response body for `POST /api/qr-code/verify`, used for every outcome.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyResponse {
    pub valid: bool,

    /// Echo of the scanned payload on success, a reason otherwise
    pub message: String,
}

impl VerifyResponse {
    pub fn valid(payload: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: payload.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

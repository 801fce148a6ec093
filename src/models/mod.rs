//! Data models for database entities and API requests/responses.

/// Redemption token entity and QR API request/response types
pub mod qr_code;

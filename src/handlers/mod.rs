//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body)
//! 2. Delegates to the QR service
//! 3. Returns HTTP response (PNG or JSON, status code)

/// Health check endpoint
pub mod health;
/// QR code generation and verification endpoints
pub mod qr_codes;

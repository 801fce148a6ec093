//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They validate input, talk to the store, and produce response payloads.

pub mod qr_service;

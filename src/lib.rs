//! QR Redemption Service
//!
//! Issues single-use QR codes tied to a user id and redeems them at most
//! once. The binary in `main.rs` wires these modules into an HTTP server;
//! they are exposed as a library so integration tests can build the same
//! router over an in-memory store.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod payload;
pub mod qr;
pub mod services;
pub mod store;
pub mod token;

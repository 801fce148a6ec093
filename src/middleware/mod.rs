//! HTTP middleware components.
//!
//! Layers applied around every route:
//! - Cross-origin resource sharing for the browser frontend
//! - Request tracing (configured in `app`)

/// CORS policy built from configuration
pub mod cors;

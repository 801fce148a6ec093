//! Router construction and shared handler state.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{handlers, store::QrStore};

/// State shared with every handler via `State` extraction.
///
/// The store is injected here rather than held in a global, so tests can
/// hand the router an in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QrStore>,

    /// Side length of generated PNGs in pixels
    pub qr_image_size: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn QrStore>, qr_image_size: u32) -> Self {
        Self {
            store,
            qr_image_size,
        }
    }
}

/// Build the HTTP router with all routes and the common layers.
///
/// CORS is added by the caller since its origin list comes from config.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/qr-code/generate",
            post(handlers::qr_codes::generate_qr_code),
        )
        .route("/qr-code/verify", post(handlers::qr_codes::verify_qr_code));

    with_common_layers(Router::new().nest("/api", api)).with_state(state)
}

/// Layers every route shares: request tracing, and turning a handler panic
/// into a 500 instead of a dropped connection.
fn with_common_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::new())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
}

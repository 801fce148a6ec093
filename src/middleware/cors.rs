//! CORS layer for the browser-based scanner and generator frontends.

use axum::http::{HeaderValue, Method, header, header::InvalidHeaderValue};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer from the configured origin list.
///
/// # Policy
///
/// - Origins: exactly those in `CORS_ALLOWED_ORIGINS`
/// - Methods: GET, POST, PUT, DELETE
/// - Headers: Origin, Content-Type, Accept
///
/// # Errors
///
/// Returns an error if an origin is not a valid header value.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]))
}

//! # Vitrine Server
//!
//! HTTP API for the product catalog: CRUD over products, filtered listing and
//! an image upload endpoint that stores resized copies next to the originals.
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - SQLite (through `vitrine-core`) for persistent storage
//! - the `image` crate for resizing uploads
//! - `tower-http` for static file serving, CORS and request tracing

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

/// Public prefix under which the uploads directory is served.
pub const UPLOADS_ROUTE: &str = "/uploads";

pub fn create_app(state: AppState) -> Router {
    let cors_layer = cors_layer(&state.config().cors_allowed_origins);
    let uploads = ServeDir::new(state.config().uploads_dir.clone());

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(routes::create_api_router(&state))
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer)
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(%origin, error = %err, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

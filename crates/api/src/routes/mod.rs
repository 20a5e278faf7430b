pub mod health;
pub mod latest;

use axum::Router;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use launchpad_common::error::AppError;

use crate::state::AppState;

/// Build the API router with all routes. Unknown paths and methods are 404.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(latest::router())
        .fallback(not_found)
        .with_state(state)
}

/// The servable application: router plus tracing and CORS, with trailing
/// slashes trimmed before routing.
pub fn create_app(state: AppState) -> NormalizePath<Router> {
    let router = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

pub(crate) async fn not_found() -> AppError {
    AppError::NotFound
}

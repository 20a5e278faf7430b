//! Health / discovery endpoint.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use launchpad_engine::pipeline::SERVICE_NAME;

use crate::routes::not_found;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check).fallback(not_found))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "endpoint": "/latest",
        "query": "?fresh=1 to bypass cache"
    }))
}

//! Latest launches endpoint.

use std::future::Future;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::task::JoinError;

use launchpad_common::error::AppError;
use launchpad_engine::pipeline::LaunchpadPayload;

use crate::routes::not_found;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/latest", get(latest).fallback(not_found))
}

/// Cache bypass flags; either one set to `1` forces a fresh run.
#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub fresh: Option<String>,
    pub nocache: Option<String>,
}

impl LatestQuery {
    pub fn bypass_cache(&self) -> bool {
        self.fresh.as_deref() == Some("1") || self.nocache.as_deref() == Some("1")
    }
}

/// GET /latest: serve the cached payload, or run the pipeline and cache the result.
///
/// Concurrent requests that miss the cache each start their own run.
async fn latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<Arc<LaunchpadPayload>>, AppError> {
    if !query.bypass_cache()
        && let Some(payload) = state.fresh_payload().await
    {
        tracing::debug!(timestamp = %payload.timestamp, "Serving cached payload");
        return Ok(Json(payload));
    }

    let payload = Arc::new(run_detached(state.start_run()).await?);

    state.store(payload.clone()).await;
    Ok(Json(payload))
}

/// Run on a separate task so a panic surfaces as a failed run instead of a
/// dropped connection. The cache is never touched on failure.
pub async fn run_detached<F, T>(run: F) -> Result<T, AppError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(run).await.map_err(|e| {
        let message = failure_message(e);
        tracing::error!(error = %message, "Launchpad run failed");
        AppError::RunFailed(message)
    })
}

fn failure_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let panic = err.into_panic();
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "run panicked".to_string()
    }
}

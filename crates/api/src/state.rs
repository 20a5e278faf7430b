//! Shared application state for the Axum API server.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use launchpad_engine::pipeline::{LaunchpadPayload, LaunchpadPipeline};

/// Starts one aggregation run.
pub type RunLauncher = Arc<dyn Fn() -> BoxFuture<'static, LaunchpadPayload> + Send + Sync>;

/// The last successful payload and when it was produced.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Arc<LaunchpadPayload>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    launcher: RunLauncher,
    pub cache: Arc<RwLock<Option<CacheEntry>>>,
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(pipeline: LaunchpadPipeline, cache_ttl: Duration) -> Self {
        let pipeline = Arc::new(pipeline);
        Self::with_launcher(
            move || {
                let pipeline = pipeline.clone();
                async move { pipeline.run().await }
            },
            cache_ttl,
        )
    }

    /// State backed by an arbitrary run source instead of the live pipeline.
    pub fn with_launcher<F, Fut>(launch: F, cache_ttl: Duration) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = LaunchpadPayload> + Send + 'static,
    {
        Self {
            launcher: Arc::new(move || launch().boxed()),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    /// A new, not yet started run.
    pub fn start_run(&self) -> BoxFuture<'static, LaunchpadPayload> {
        (self.launcher)()
    }

    /// The cached payload, if one exists and is still within the cache window.
    pub async fn fresh_payload(&self) -> Option<Arc<LaunchpadPayload>> {
        self.cache
            .read()
            .await
            .as_ref()
            .filter(|entry| entry.is_fresh(self.cache_ttl))
            .map(|entry| entry.payload.clone())
    }

    /// Replace the cached payload. Only called after a successful run.
    pub async fn store(&self, payload: Arc<LaunchpadPayload>) {
        *self.cache.write().await = Some(CacheEntry {
            payload,
            fetched_at: Instant::now(),
        });
    }
}

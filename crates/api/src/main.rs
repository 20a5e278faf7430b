//! Prism launchpad API server binary entrypoint.

use std::net::SocketAddr;

use axum::ServiceExt;
use axum::extract::Request;
use tracing_subscriber::EnvFilter;

use launchpad_common::config::AppConfig;
use launchpad_engine::pipeline::LaunchpadPipeline;

use launchpad_api::routes::create_app;
use launchpad_api::state::AppState;

const DEFAULT_LOG_FILTER: &str =
    "launchpad_api=info,launchpad_engine=info,launchpad_sources=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting Prism launchpad API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    let http = reqwest::Client::builder().build()?;
    let pipeline = LaunchpadPipeline::from_config(&config, http);
    tracing::info!(
        max_results = pipeline.settings().max_results,
        first_time_agents_only = pipeline.settings().first_time_agents_only,
        verification_enabled = pipeline.verification_enabled(),
        cache_ms = config.cache_ms,
        "Pipeline configured"
    );

    let state = AppState::new(pipeline, config.cache_ttl());
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

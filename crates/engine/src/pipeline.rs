//! Pipeline orchestration.
//!
//! One run:
//! 1. Fetch Clawnch (tokens + launches) and ClawnchMarketCap concurrently,
//!    each source degrading to an empty list on failure
//! 2. Normalize and merge into canonical records (via `Normalizer`)
//! 3. Derive per-agent insight (via `InsightEngine`)
//! 4. Verify contract addresses when a verifier is configured and launches were emitted
//! 5. Assemble the timestamped payload

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use launchpad_common::config::AppConfig;
use launchpad_common::types::{AnnotatedLaunch, LaunchpadInsight};
use launchpad_sources::basescan::BasescanClient;
use launchpad_sources::clawnch::{ClawnchClient, ClawnchFetch, ClawnchLaunch, ClawnchToken};
use launchpad_sources::marketcap::{MarketcapClient, MarketcapToken};
use launchpad_sources::{FetchDebug, SourceFetch};

use crate::enricher::{self, ContractVerifier};
use crate::insight::{InsightEngine, InsightOutcome, InsightSettings};
use crate::normalizer::Normalizer;

/// Service name reported in payloads and the health endpoint.
pub const SERVICE_NAME: &str = "prism-launchpad";

/// Per-source fetch diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourcesDebug {
    pub clawnch_tokens: FetchDebug,
    pub clawnch_launches: FetchDebug,
    pub clawnchmarketcap_tokens: FetchDebug,
}

/// Response payload of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchpadPayload {
    /// RFC 3339 UTC, millisecond precision
    pub timestamp: String,
    pub service: String,
    pub clawnch_tokens: Vec<ClawnchToken>,
    pub clawnch_launches: Vec<ClawnchLaunch>,
    pub clawnchmarketcap_tokens: Vec<MarketcapToken>,
    pub new_agent_launches: Vec<AnnotatedLaunch>,
    pub launchpad_insight: LaunchpadInsight,
    /// Lower-cased address → verified. Absent (not empty) when enrichment is skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_verified: Option<BTreeMap<String, bool>>,
    pub debug: SourcesDebug,
}

impl LaunchpadPayload {
    pub fn assemble(
        clawnch: ClawnchFetch,
        marketcap: SourceFetch<MarketcapToken>,
        outcome: InsightOutcome,
        contract_verified: Option<BTreeMap<String, bool>>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            service: SERVICE_NAME.to_string(),
            debug: SourcesDebug {
                clawnch_tokens: clawnch.tokens.debug,
                clawnch_launches: clawnch.launches.debug,
                clawnchmarketcap_tokens: marketcap.debug,
            },
            clawnch_tokens: clawnch.tokens.items,
            clawnch_launches: clawnch.launches.items,
            clawnchmarketcap_tokens: marketcap.items,
            new_agent_launches: outcome.launches,
            launchpad_insight: outcome.insight,
            contract_verified,
        }
    }
}

/// The aggregation pipeline. Holds the upstream clients and run settings;
/// carries no state between runs.
pub struct LaunchpadPipeline<V = BasescanClient> {
    clawnch: ClawnchClient,
    marketcap: MarketcapClient,
    verifier: Option<V>,
    settings: InsightSettings,
    verify_batch: usize,
}

impl LaunchpadPipeline<BasescanClient> {
    pub fn new(clawnch: ClawnchClient, marketcap: MarketcapClient, settings: InsightSettings) -> Self {
        Self {
            clawnch,
            marketcap,
            verifier: None,
            settings,
            verify_batch: 0,
        }
    }

    /// Wire every client from configuration. BaseScan enrichment is enabled
    /// only when an API key is configured.
    pub fn from_config(config: &AppConfig, http: reqwest::Client) -> Self {
        let clawnch = ClawnchClient::new(http.clone(), &config.clawnch_api_url, config.clawnch_fetch_timeout())
            .with_limits(config.clawnch_tokens_limit, config.clawnch_launches_limit);
        let marketcap = MarketcapClient::new(
            http.clone(),
            &config.clawnchmarketcap_api_url,
            config.clawnchmarketcap_fetch_timeout(),
        )
        .with_limit(config.clawnchmarketcap_tokens_limit);
        let settings = InsightSettings {
            max_results: config.new_agent_launches_max,
            first_time_agents_only: config.first_time_agents_only,
        };

        let pipeline = Self::new(clawnch, marketcap, settings);
        match &config.basescan_api_key {
            Some(key) => {
                let basescan = BasescanClient::new(
                    http,
                    &config.basescan_api_url,
                    key,
                    config.basescan_fetch_timeout(),
                );
                pipeline.with_verifier(basescan, config.basescan_batch)
            }
            None => pipeline,
        }
    }
}

impl<V: ContractVerifier> LaunchpadPipeline<V> {
    /// Enable verification enrichment for up to `batch` addresses per run.
    pub fn with_verifier<W: ContractVerifier>(self, verifier: W, batch: usize) -> LaunchpadPipeline<W> {
        LaunchpadPipeline {
            clawnch: self.clawnch,
            marketcap: self.marketcap,
            verifier: Some(verifier),
            settings: self.settings,
            verify_batch: batch,
        }
    }

    pub fn settings(&self) -> &InsightSettings {
        &self.settings
    }

    pub fn verification_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    /// Execute one full run. Upstream failures degrade inside the run and
    /// never abort it.
    pub async fn run(&self) -> LaunchpadPayload {
        let run_id = Uuid::new_v4();
        self.execute()
            .instrument(tracing::info_span!("launchpad_run", %run_id))
            .await
    }

    async fn execute(&self) -> LaunchpadPayload {
        let started = Instant::now();

        let (clawnch, marketcap) = tokio::join!(self.clawnch.fetch(), self.marketcap.fetch_tokens());

        let batch = Normalizer::normalize(
            &clawnch.launches.items,
            &clawnch.tokens.items,
            &marketcap.items,
        );
        let normalized = batch.len();

        let outcome = InsightEngine::derive(batch.into_merged(), &self.settings);

        let contract_verified = match &self.verifier {
            Some(verifier) if !outcome.launches.is_empty() => {
                Some(enricher::enrich(verifier, &outcome.launches, self.verify_batch).await)
            }
            _ => None,
        };

        tracing::info!(
            clawnch_tokens = clawnch.tokens.items.len(),
            clawnch_launches = clawnch.launches.items.len(),
            clawnchmarketcap_tokens = marketcap.items.len(),
            normalized,
            emitted = outcome.launches.len(),
            total_agents = outcome.insight.total_agents,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Launchpad run complete"
        );

        LaunchpadPayload::assemble(clawnch, marketcap, outcome, contract_verified)
    }
}

use std::time::Duration;

use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen port (default: 3003)
    pub port: u16,

    /// Clawnch API base URL (serves `/tokens` and `/launches`)
    pub clawnch_api_url: String,

    /// ClawnchMarketCap API base URL (serves `/tokens`)
    pub clawnchmarketcap_api_url: String,

    /// BaseScan API endpoint used for contract verification lookups
    pub basescan_api_url: String,

    /// Per-request timeout for both Clawnch endpoints
    pub clawnch_fetch_timeout_ms: u64,

    pub clawnchmarketcap_fetch_timeout_ms: u64,

    pub basescan_fetch_timeout_ms: u64,

    /// Maximum Clawnch tokens kept per fetch (default 80, max 150)
    pub clawnch_tokens_limit: usize,

    /// Maximum Clawnch launches kept per fetch (default 50, max 100)
    pub clawnch_launches_limit: usize,

    /// Maximum ClawnchMarketCap tokens kept per fetch (default 150, max 300)
    pub clawnchmarketcap_tokens_limit: usize,

    /// Maximum number of records emitted in `new_agent_launches`
    pub new_agent_launches_max: usize,

    /// Maximum number of contract addresses verified per run (default 10, max 20)
    pub basescan_batch: usize,

    /// How long a payload is served from cache, in milliseconds (max 120000)
    pub cache_ms: u64,

    /// Only emit launches from agents seen exactly once in the batch
    pub first_time_agents_only: bool,

    /// BaseScan API key. Verification enrichment is skipped when unset.
    pub basescan_api_key: Option<String>,
}

const CLAWNCH_TOKENS_LIMIT_MAX: usize = 150;
const CLAWNCH_LAUNCHES_LIMIT_MAX: usize = 100;
const CLAWNCHMARKETCAP_TOKENS_LIMIT_MAX: usize = 300;
const BASESCAN_BATCH_MAX: usize = 20;
const CACHE_MS_MAX: u64 = 120_000;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3003,
            clawnch_api_url: "https://clawn.ch/api".to_string(),
            clawnchmarketcap_api_url: "https://clawnchmarketcap.com/api".to_string(),
            basescan_api_url: "https://api.basescan.org/api".to_string(),
            clawnch_fetch_timeout_ms: 15_000,
            clawnchmarketcap_fetch_timeout_ms: 10_000,
            basescan_fetch_timeout_ms: 8_000,
            clawnch_tokens_limit: 80,
            clawnch_launches_limit: 50,
            clawnchmarketcap_tokens_limit: 150,
            new_agent_launches_max: 80,
            basescan_batch: 10,
            cache_ms: 30_000,
            first_time_agents_only: true,
            basescan_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Every variable is optional. Present numeric values must parse as unsigned
    /// integers; zero falls back to the default and values above a bound are clamped.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            port: match var("PORT") {
                Some(raw) => raw
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| anyhow::anyhow!("PORT must be a valid port number"))?,
                None => defaults.port,
            },
            clawnch_api_url: var("CLAWNCH_API_URL").unwrap_or(defaults.clawnch_api_url),
            clawnchmarketcap_api_url: var("CLAWNCHMARKETCAP_API_URL")
                .unwrap_or(defaults.clawnchmarketcap_api_url),
            basescan_api_url: var("BASESCAN_API_URL").unwrap_or(defaults.basescan_api_url),
            clawnch_fetch_timeout_ms: parse_or(
                var("CLAWNCH_FETCH_TIMEOUT_MS"),
                "CLAWNCH_FETCH_TIMEOUT_MS",
                defaults.clawnch_fetch_timeout_ms,
            )?,
            clawnchmarketcap_fetch_timeout_ms: parse_or(
                var("CLAWNCHMARKETCAP_FETCH_TIMEOUT_MS"),
                "CLAWNCHMARKETCAP_FETCH_TIMEOUT_MS",
                defaults.clawnchmarketcap_fetch_timeout_ms,
            )?,
            basescan_fetch_timeout_ms: parse_or(
                var("BASESCAN_FETCH_TIMEOUT_MS"),
                "BASESCAN_FETCH_TIMEOUT_MS",
                defaults.basescan_fetch_timeout_ms,
            )?,
            clawnch_tokens_limit: parse_or(
                var("CLAWNCH_TOKENS_LIMIT"),
                "CLAWNCH_TOKENS_LIMIT",
                defaults.clawnch_tokens_limit,
            )?
            .min(CLAWNCH_TOKENS_LIMIT_MAX),
            clawnch_launches_limit: parse_or(
                var("CLAWNCH_LAUNCHES_LIMIT"),
                "CLAWNCH_LAUNCHES_LIMIT",
                defaults.clawnch_launches_limit,
            )?
            .min(CLAWNCH_LAUNCHES_LIMIT_MAX),
            clawnchmarketcap_tokens_limit: parse_or(
                var("CLAWNCHMARKETCAP_TOKENS_LIMIT"),
                "CLAWNCHMARKETCAP_TOKENS_LIMIT",
                defaults.clawnchmarketcap_tokens_limit,
            )?
            .min(CLAWNCHMARKETCAP_TOKENS_LIMIT_MAX),
            new_agent_launches_max: parse_or(
                var("NEW_AGENT_LAUNCHES_MAX"),
                "NEW_AGENT_LAUNCHES_MAX",
                defaults.new_agent_launches_max,
            )?,
            basescan_batch: parse_or(var("BASESCAN_BATCH"), "BASESCAN_BATCH", defaults.basescan_batch)?
                .min(BASESCAN_BATCH_MAX),
            cache_ms: parse_or(var("LAUNCHPAD_CACHE_MS"), "LAUNCHPAD_CACHE_MS", defaults.cache_ms)?
                .min(CACHE_MS_MAX),
            first_time_agents_only: var("FIRST_TIME_AGENTS_ONLY").as_deref() != Some("false"),
            basescan_api_key: var("BASESCAN_API_KEY"),
        })
    }

    pub fn clawnch_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.clawnch_fetch_timeout_ms)
    }

    pub fn clawnchmarketcap_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.clawnchmarketcap_fetch_timeout_ms)
    }

    pub fn basescan_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.basescan_fetch_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ms)
    }
}

/// Parse an optional unsigned value, treating zero as "use the default".
fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw {
        Some(raw) => {
            let value: T = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("{key} must be a valid unsigned integer"))?;
            if value == T::default() {
                tracing::debug!(key, "Zero configured, falling back to default");
                Ok(default)
            } else {
                Ok(value)
            }
        }
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3003);
        assert_eq!(config.new_agent_launches_max, 80);
        assert_eq!(config.basescan_batch, 10);
        assert_eq!(config.cache_ms, 30_000);
        assert!(config.first_time_agents_only);
        assert!(config.basescan_api_key.is_none());
    }

    #[test]
    fn test_limits_are_clamped() {
        let config = config_from(&[
            ("CLAWNCH_TOKENS_LIMIT", "1000"),
            ("CLAWNCH_LAUNCHES_LIMIT", "1000"),
            ("CLAWNCHMARKETCAP_TOKENS_LIMIT", "1000"),
            ("BASESCAN_BATCH", "99"),
            ("LAUNCHPAD_CACHE_MS", "600000"),
        ])
        .unwrap();
        assert_eq!(config.clawnch_tokens_limit, 150);
        assert_eq!(config.clawnch_launches_limit, 100);
        assert_eq!(config.clawnchmarketcap_tokens_limit, 300);
        assert_eq!(config.basescan_batch, 20);
        assert_eq!(config.cache_ms, 120_000);
    }

    #[test]
    fn test_zero_falls_back_to_default() {
        let config = config_from(&[("NEW_AGENT_LAUNCHES_MAX", "0")]).unwrap();
        assert_eq!(config.new_agent_launches_max, 80);
    }

    #[test]
    fn test_invalid_number_rejected() {
        assert!(config_from(&[("BASESCAN_BATCH", "ten")]).is_err());
        assert!(config_from(&[("PORT", "-1")]).is_err());
    }

    #[test]
    fn test_first_time_agents_only_toggle() {
        assert!(!config_from(&[("FIRST_TIME_AGENTS_ONLY", "false")]).unwrap().first_time_agents_only);
        assert!(config_from(&[("FIRST_TIME_AGENTS_ONLY", "0")]).unwrap().first_time_agents_only);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = config_from(&[("BASESCAN_API_KEY", "   ")]).unwrap();
        assert!(config.basescan_api_key.is_none());

        let config = config_from(&[("BASESCAN_API_KEY", "abc123")]).unwrap();
        assert_eq!(config.basescan_api_key.as_deref(), Some("abc123"));
    }
}

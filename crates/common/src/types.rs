use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Chain context every launch record is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Base,
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Base => write!(f, "base"),
        }
    }
}

/// Upstream provenance of a launch record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchSource {
    /// Clawnch `/launches`
    ClawnchLaunch,
    /// Clawnch `/tokens`
    ClawnchToken,
    /// ClawnchMarketCap `/tokens`
    MarketcapToken,
}

impl std::fmt::Display for LaunchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchSource::ClawnchLaunch => write!(f, "clawnch-launch"),
            LaunchSource::ClawnchToken => write!(f, "clawnch-token"),
            LaunchSource::MarketcapToken => write!(f, "marketcap-token"),
        }
    }
}

/// Canonical launch record produced by normalizing any of the upstream sources.
///
/// Every field is always serialized; missing upstream data is an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRecord {
    pub source: LaunchSource,
    pub platform: Chain,
    pub symbol: Option<String>,
    pub name: Option<String>,
    /// Trimmed agent name; never `Some("")`
    pub agent_name: Option<String>,
    /// Lower-cased contract address
    pub contract_address: Option<String>,
    pub launched_at: Option<String>,
    pub post_url: Option<String>,
    /// Market cap, only ever set for ClawnchMarketCap records
    pub mc: Option<f64>,
}

impl LaunchRecord {
    /// A record takes part in insight only with a symbol and either a launch
    /// time or a contract address.
    pub fn is_valid(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.symbol) && (present(&self.launched_at) || present(&self.contract_address))
    }

    /// Grouping key for per-agent counts: the trimmed agent name, if non-empty.
    pub fn agent_key(&self) -> Option<&str> {
        self.agent_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Launch time as Unix milliseconds, `0` when missing or unparsable.
    pub fn launched_at_millis(&self) -> i64 {
        self.launched_at
            .as_deref()
            .and_then(parse_timestamp_millis)
            .unwrap_or(0)
    }
}

/// Parse the timestamp shapes seen upstream: RFC 3339, naive ISO (assumed UTC),
/// bare dates, and numeric epoch seconds or milliseconds.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis());
    }
    if let Ok(n) = raw.parse::<i64>() {
        // Distinguish seconds from milliseconds
        return if n > 1_000_000_000_000 { Some(n) } else { n.checked_mul(1000) };
    }
    None
}

/// A launch record annotated with per-agent insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedLaunch {
    #[serde(flatten)]
    pub record: LaunchRecord,
    /// Launches by this agent across the whole filtered batch (0 without an agent)
    pub agent_launch_count: u32,
    pub is_first_launch: bool,
}

/// Aggregate statistics over the full filtered batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchpadInsight {
    pub total_agents: usize,
    pub first_time_agents_count: usize,
    pub repeat_agents_count: usize,
    pub first_time_agents_only: bool,
    pub new_agent_launches_count: usize,
}

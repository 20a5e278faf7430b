//! Normalizer. Maps each upstream record shape into the canonical `LaunchRecord`.
//!
//! Field fallback chains:
//! - Clawnch launch: `contractAddress` → `address`, `agentName` → `agent`,
//!   `launchedAt` → `createdAt`, `clankerUrl` → `clanker_url`
//! - Clawnch token: `agent`, `address`, `source_url` → `clanker_url`
//! - ClawnchMarketCap token: 1:1, with `marketCap` coerced to a number
//!
//! Empty strings count as missing. Nothing here can fail.

use serde_json::Value;

use launchpad_common::types::{Chain, LaunchRecord, LaunchSource};
use launchpad_sources::clawnch::{ClawnchLaunch, ClawnchToken};
use launchpad_sources::marketcap::MarketcapToken;

/// Normalized records, one list per source, in upstream order.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub clawnch_launches: Vec<LaunchRecord>,
    pub clawnch_tokens: Vec<LaunchRecord>,
    pub marketcap_tokens: Vec<LaunchRecord>,
}

impl NormalizedBatch {
    /// Concatenate in insight order: launches, Clawnch tokens, market-cap tokens.
    pub fn into_merged(self) -> Vec<LaunchRecord> {
        let mut merged = self.clawnch_launches;
        merged.extend(self.clawnch_tokens);
        merged.extend(self.marketcap_tokens);
        merged
    }

    pub fn len(&self) -> usize {
        self.clawnch_launches.len() + self.clawnch_tokens.len() + self.marketcap_tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Normalizer;

impl Normalizer {
    pub fn normalize(
        launches: &[ClawnchLaunch],
        tokens: &[ClawnchToken],
        marketcap: &[MarketcapToken],
    ) -> NormalizedBatch {
        NormalizedBatch {
            clawnch_launches: launches.iter().map(Self::from_clawnch_launch).collect(),
            clawnch_tokens: tokens.iter().map(Self::from_clawnch_token).collect(),
            marketcap_tokens: marketcap.iter().map(Self::from_marketcap_token).collect(),
        }
    }

    pub fn from_clawnch_launch(launch: &ClawnchLaunch) -> LaunchRecord {
        LaunchRecord {
            source: LaunchSource::ClawnchLaunch,
            platform: Chain::Base,
            symbol: text(&launch.symbol),
            name: text(&launch.name),
            agent_name: agent(first(&[&launch.agent_name, &launch.agent])),
            contract_address: address(first(&[&launch.contract_address, &launch.address])),
            launched_at: first(&[&launch.launched_at, &launch.created_at]),
            post_url: first(&[&launch.clanker_url, &launch.clanker_url_snake]),
            mc: None,
        }
    }

    pub fn from_clawnch_token(token: &ClawnchToken) -> LaunchRecord {
        LaunchRecord {
            source: LaunchSource::ClawnchToken,
            platform: Chain::Base,
            symbol: text(&token.symbol),
            name: text(&token.name),
            agent_name: agent(text(&token.agent)),
            contract_address: address(text(&token.address)),
            launched_at: text(&token.launched_at),
            post_url: first(&[&token.source_url, &token.clanker_url]),
            mc: None,
        }
    }

    pub fn from_marketcap_token(token: &MarketcapToken) -> LaunchRecord {
        LaunchRecord {
            source: LaunchSource::MarketcapToken,
            platform: Chain::Base,
            symbol: text(&token.symbol),
            name: text(&token.name),
            agent_name: agent(text(&token.agent_name)),
            contract_address: address(text(&token.contract_address)),
            launched_at: text(&token.launched_at),
            post_url: text(&token.post_url),
            mc: token.market_cap.as_ref().and_then(coerce_number),
        }
    }
}

/// Non-empty string value. Whitespace-only values are kept as-is.
fn text(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(String::from)
}

/// First non-empty value of a fallback chain.
fn first(chain: &[&Option<String>]) -> Option<String> {
    chain.iter().find_map(|v| text(v))
}

fn agent(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

fn address(addr: Option<String>) -> Option<String> {
    addr.map(|a| a.trim().to_lowercase()).filter(|a| !a.is_empty())
}

/// Numbers pass through; numeric strings are parsed. Non-finite values are dropped.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_launch_prefers_primary_fields() {
        let launch = ClawnchLaunch {
            symbol: Some("CLAW".to_string()),
            contract_address: Some("0xAAA".to_string()),
            address: Some("0xBBB".to_string()),
            agent_name: Some("Primary".to_string()),
            agent: Some("Fallback".to_string()),
            launched_at: Some("2025-02-02T00:00:00Z".to_string()),
            created_at: Some("2025-01-01T00:00:00Z".to_string()),
            clanker_url: Some("https://a".to_string()),
            clanker_url_snake: Some("https://b".to_string()),
            ..Default::default()
        };
        let record = Normalizer::from_clawnch_launch(&launch);
        assert_eq!(record.source, LaunchSource::ClawnchLaunch);
        assert_eq!(record.contract_address.as_deref(), Some("0xaaa"));
        assert_eq!(record.agent_name.as_deref(), Some("Primary"));
        assert_eq!(record.launched_at.as_deref(), Some("2025-02-02T00:00:00Z"));
        assert_eq!(record.post_url.as_deref(), Some("https://a"));
        assert!(record.mc.is_none());
    }

    #[test]
    fn test_launch_falls_back_to_alternates() {
        let launch = ClawnchLaunch {
            symbol: Some("CLAW".to_string()),
            address: Some("0xBBB".to_string()),
            agent_name: Some("".to_string()),
            agent: Some(" Fallback ".to_string()),
            created_at: Some("2025-01-01T00:00:00Z".to_string()),
            clanker_url_snake: Some("https://b".to_string()),
            ..Default::default()
        };
        let record = Normalizer::from_clawnch_launch(&launch);
        assert_eq!(record.contract_address.as_deref(), Some("0xbbb"));
        assert_eq!(record.agent_name.as_deref(), Some("Fallback"));
        assert_eq!(record.launched_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(record.post_url.as_deref(), Some("https://b"));
    }

    #[test]
    fn test_token_post_url_fallback() {
        let token = ClawnchToken {
            symbol: Some("TOK".to_string()),
            agent: Some("Molty".to_string()),
            address: Some("0xCCC".to_string()),
            clanker_url: Some("https://clanker".to_string()),
            ..Default::default()
        };
        let record = Normalizer::from_clawnch_token(&token);
        assert_eq!(record.source, LaunchSource::ClawnchToken);
        assert_eq!(record.agent_name.as_deref(), Some("Molty"));
        assert_eq!(record.contract_address.as_deref(), Some("0xccc"));
        assert_eq!(record.post_url.as_deref(), Some("https://clanker"));
    }

    #[test]
    fn test_empty_agent_is_absent() {
        let token = ClawnchToken {
            symbol: Some("TOK".to_string()),
            agent: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(Normalizer::from_clawnch_token(&token).agent_name.is_none());
    }

    #[test]
    fn test_whitespace_symbol_is_kept() {
        let token = MarketcapToken {
            symbol: Some(" ".to_string()),
            launched_at: Some("2025-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        let record = Normalizer::from_marketcap_token(&token);
        assert_eq!(record.symbol.as_deref(), Some(" "));
        assert!(record.is_valid());
    }

    #[test]
    fn test_marketcap_number_coercion() {
        let mut token = MarketcapToken {
            symbol: Some("MC".to_string()),
            market_cap: Some(json!("12345.5")),
            ..Default::default()
        };
        assert_eq!(Normalizer::from_marketcap_token(&token).mc, Some(12345.5));

        token.market_cap = Some(json!(99));
        assert_eq!(Normalizer::from_marketcap_token(&token).mc, Some(99.0));

        token.market_cap = Some(json!("n/a"));
        assert_eq!(Normalizer::from_marketcap_token(&token).mc, None);

        token.market_cap = None;
        assert_eq!(Normalizer::from_marketcap_token(&token).mc, None);
    }

    #[test]
    fn test_missing_fields_are_null() {
        let record = Normalizer::from_marketcap_token(&MarketcapToken::default());
        let json = serde_json::to_value(&record).unwrap();
        for key in ["symbol", "name", "agentName", "contractAddress", "launchedAt", "postUrl", "mc"] {
            assert!(json.get(key).is_some_and(Value::is_null), "{key} should be null");
        }
        assert_eq!(json["platform"], "base");
    }

    #[test]
    fn test_merge_order_and_input_order() {
        let launches = vec![ClawnchLaunch {
            symbol: Some("L1".to_string()),
            ..Default::default()
        }];
        let tokens = vec![
            ClawnchToken {
                symbol: Some("T1".to_string()),
                ..Default::default()
            },
            ClawnchToken {
                symbol: Some("T2".to_string()),
                ..Default::default()
            },
        ];
        let marketcap = vec![MarketcapToken {
            symbol: Some("M1".to_string()),
            ..Default::default()
        }];

        let batch = Normalizer::normalize(&launches, &tokens, &marketcap);
        assert_eq!(batch.len(), 4);
        let symbols: Vec<_> = batch
            .into_merged()
            .into_iter()
            .map(|r| r.symbol.unwrap())
            .collect();
        assert_eq!(symbols, vec!["L1", "T1", "T2", "M1"]);
    }
}

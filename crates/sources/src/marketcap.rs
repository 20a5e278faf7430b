//! ClawnchMarketCap client: the Base agent-token list with market caps.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::{Result, SourceFetch, get_json};

const DESCRIPTION_MAX_CHARS: usize = 500;

/// A token from ClawnchMarketCap `/tokens`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketcapToken {
    #[serde(default, deserialize_with = "lenient::string")]
    pub contract_address: Option<String>,
    /// Raw market cap, number or numeric string upstream
    #[serde(default)]
    pub market_cap: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub post_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_platform_token: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub agent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub launched_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MarketcapClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    tokens_limit: usize,
}

impl MarketcapClient {
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            tokens_limit: 150,
        }
    }

    pub fn with_limit(mut self, tokens_limit: usize) -> Self {
        self.tokens_limit = tokens_limit;
        self
    }

    pub async fn fetch_tokens(&self) -> SourceFetch<MarketcapToken> {
        SourceFetch::from_result("clawnchmarketcap_tokens", self.try_fetch_tokens().await)
    }

    async fn try_fetch_tokens(&self) -> Result<Vec<MarketcapToken>> {
        let request = self
            .client
            .get(format!("{}/tokens", self.base_url))
            .timeout(self.timeout);
        let body = get_json(request).await?;

        // Only a bare array is a valid token list here
        let items = lenient::extract_items(body, None);
        let mut tokens: Vec<MarketcapToken> = lenient::decode_items(items, self.tokens_limit);
        for token in &mut tokens {
            token.description = lenient::truncate_chars(token.description.take(), DESCRIPTION_MAX_CHARS);
        }
        Ok(tokens)
    }
}

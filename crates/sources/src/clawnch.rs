//! Clawnch API client: agent-only token launches on Base.
//!
//! Two public endpoints, no API key:
//! - `GET /tokens`: every agent-launched token
//! - `GET /launches`: recent launches, newest first

use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::{Result, SourceFetch, get_json};

const CLIENT_USER_AGENT: &str = "Mozilla/5.0 (compatible; PrismLaunchpad/1.0)";
const DESCRIPTION_MAX_CHARS: usize = 300;

/// A token from Clawnch `/tokens`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClawnchToken {
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub agent: Option<String>,
    /// Social platform the launch was posted on (Moltbook, 4claw, ...)
    #[serde(default, deserialize_with = "lenient::string")]
    pub source: Option<String>,
    #[serde(rename = "launchedAt", default, deserialize_with = "lenient::string")]
    pub launched_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(rename = "postId", default)]
    pub post_id: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub clanker_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub explorer_url: Option<String>,
}

/// A launch from Clawnch `/launches`.
///
/// Upstream uses several spellings for the same field; all are kept so the
/// normalizer can apply its fallback chains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClawnchLaunch {
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(rename = "contractAddress", default, deserialize_with = "lenient::string")]
    pub contract_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: Option<String>,
    #[serde(rename = "agentName", default, deserialize_with = "lenient::string")]
    pub agent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub agent: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub source: Option<String>,
    #[serde(rename = "launchedAt", default, deserialize_with = "lenient::string")]
    pub launched_at: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(rename = "postId", default)]
    pub post_id: Option<serde_json::Value>,
    #[serde(rename = "clankerUrl", default, deserialize_with = "lenient::string")]
    pub clanker_url: Option<String>,
    #[serde(rename = "clanker_url", default, deserialize_with = "lenient::string")]
    pub clanker_url_snake: Option<String>,
    #[serde(rename = "chainId", default)]
    pub chain_id: Option<serde_json::Value>,
}

/// Combined outcome of the two Clawnch endpoints.
#[derive(Debug, Clone)]
pub struct ClawnchFetch {
    pub tokens: SourceFetch<ClawnchToken>,
    pub launches: SourceFetch<ClawnchLaunch>,
}

#[derive(Debug, Clone)]
pub struct ClawnchClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    tokens_limit: usize,
    launches_limit: usize,
}

impl ClawnchClient {
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            tokens_limit: 80,
            launches_limit: 50,
        }
    }

    /// Cap the number of records kept from each endpoint.
    pub fn with_limits(mut self, tokens_limit: usize, launches_limit: usize) -> Self {
        self.tokens_limit = tokens_limit;
        self.launches_limit = launches_limit;
        self
    }

    /// Fetch tokens and launches concurrently. Each endpoint degrades on its own.
    pub async fn fetch(&self) -> ClawnchFetch {
        let (tokens, launches) = tokio::join!(self.fetch_tokens(), self.fetch_launches());
        ClawnchFetch { tokens, launches }
    }

    pub async fn fetch_tokens(&self) -> SourceFetch<ClawnchToken> {
        SourceFetch::from_result("clawnch_tokens", self.try_fetch_tokens().await)
    }

    pub async fn fetch_launches(&self) -> SourceFetch<ClawnchLaunch> {
        SourceFetch::from_result("clawnch_launches", self.try_fetch_launches().await)
    }

    async fn try_fetch_tokens(&self) -> Result<Vec<ClawnchToken>> {
        let body = get_json(self.request("tokens")).await?;
        let items = lenient::extract_items(body, Some("tokens"));
        let mut tokens: Vec<ClawnchToken> = lenient::decode_items(items, self.tokens_limit);
        for token in &mut tokens {
            token.description = lenient::truncate_chars(token.description.take(), DESCRIPTION_MAX_CHARS);
        }
        Ok(tokens)
    }

    async fn try_fetch_launches(&self) -> Result<Vec<ClawnchLaunch>> {
        let body = get_json(self.request("launches")).await?;
        let items = lenient::extract_items(body, Some("launches"));
        Ok(lenient::decode_items(items, self.launches_limit))
    }

    fn request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{}", self.base_url, endpoint))
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .timeout(self.timeout)
    }
}

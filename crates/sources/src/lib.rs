pub mod basescan;
pub mod clawnch;
pub mod error;
pub mod lenient;
pub mod marketcap;

pub use error::{Result, SourceError};

use reqwest::header::ACCEPT;
use serde::Serialize;

/// Diagnostic descriptor attached to every fetch outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchDebug {
    /// Records kept after decoding and capping
    pub count: usize,
    /// Upstream HTTP status, set for non-2xx responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Reason the fetch degraded (network error, `timeout`, malformed body)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Best-effort result of one upstream fetch. A failed fetch is an empty list
/// plus a populated [`FetchDebug`], never an error.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFetch<T> {
    pub items: Vec<T>,
    pub debug: FetchDebug,
}

impl<T> SourceFetch<T> {
    /// Degrade a fallible fetch into a best-effort outcome.
    pub fn from_result(source: &'static str, result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => {
                tracing::debug!(source, count = items.len(), "Upstream fetch complete");
                Self {
                    debug: FetchDebug {
                        count: items.len(),
                        ..Default::default()
                    },
                    items,
                }
            }
            Err(err) => {
                tracing::warn!(source, error = %err, "Upstream fetch degraded to empty result");
                let debug = match err {
                    SourceError::Status { status } => FetchDebug {
                        status: Some(status),
                        ..Default::default()
                    },
                    other => FetchDebug {
                        error: Some(other.to_string()),
                        ..Default::default()
                    },
                };
                Self {
                    items: Vec::new(),
                    debug,
                }
            }
        }
    }
}

/// Send a GET and decode the JSON body. Non-2xx statuses and undecodable
/// bodies are errors.
pub(crate) async fn get_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value> {
    let resp = request.header(ACCEPT, "application/json").send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
        });
    }

    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| SourceError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_failure_sets_status_only() {
        let fetch: SourceFetch<u8> =
            SourceFetch::from_result("test", Err(SourceError::Status { status: 502 }));
        assert!(fetch.items.is_empty());
        assert_eq!(fetch.debug.status, Some(502));
        assert!(fetch.debug.error.is_none());
    }

    #[test]
    fn test_timeout_failure_sets_error() {
        let fetch: SourceFetch<u8> = SourceFetch::from_result("test", Err(SourceError::Timeout));
        assert_eq!(fetch.debug.error.as_deref(), Some("timeout"));
        assert_eq!(fetch.debug.count, 0);
    }

    #[test]
    fn test_success_counts_items() {
        let fetch = SourceFetch::from_result("test", Ok(vec![1u8, 2, 3]));
        assert_eq!(fetch.debug.count, 3);
        assert_eq!(fetch.debug, FetchDebug { count: 3, status: None, error: None });
    }
}

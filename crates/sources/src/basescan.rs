//! BaseScan contract verification lookup.
//!
//! `GET ?module=contract&action=getabi&address=0x...` returns the ABI for
//! verified contracts. Any failure reads as unverified.

use std::time::Duration;

use serde_json::Value;

use crate::{Result, get_json};

const NOT_VERIFIED_RESULT: &str = "Contract source code not verified";

#[derive(Debug, Clone)]
pub struct BasescanClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl BasescanClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    /// Whether the contract at `address` has verified source on BaseScan.
    ///
    /// Malformed addresses short-circuit to `false` without a request; errors,
    /// timeouts and empty results are also `false`.
    pub async fn is_verified(&self, address: &str) -> bool {
        let Some(address) = normalize_address(address) else {
            return false;
        };
        if self.api_key.is_empty() {
            return false;
        }

        match self.fetch_abi(&address).await {
            Ok(body) => abi_indicates_verified(&body),
            Err(e) => {
                tracing::debug!(address = %address, error = %e, "BaseScan lookup failed, treating as unverified");
                false
            }
        }
    }

    async fn fetch_abi(&self, address: &str) -> Result<Value> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address),
                ("apikey", self.api_key.as_str()),
            ])
            .timeout(self.timeout);
        get_json(request).await
    }
}

/// Trim and lower-case an address, rejecting anything that is not `0x` + 40 hex digits.
pub fn normalize_address(raw: &str) -> Option<String> {
    let addr = raw.trim().to_lowercase();
    let hex = addr.strip_prefix("0x")?;
    if hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(addr)
    } else {
        None
    }
}

/// Interpret a `getabi` response envelope.
pub fn abi_indicates_verified(body: &Value) -> bool {
    // status "0" marks error envelopes (rate limit, invalid key)
    if body.get("status").and_then(Value::as_str) == Some("0") {
        return false;
    }
    match body.get("result") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty() && s != NOT_VERIFIED_RESULT,
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDRESS: &str = "0x4200000000000000000000000000000000000006";

    #[test]
    fn test_normalize_address_lowercases() {
        let raw = "  0xABCDEF0000000000000000000000000000000001 ";
        assert_eq!(
            normalize_address(raw).as_deref(),
            Some("0xabcdef0000000000000000000000000000000001")
        );
    }

    #[test]
    fn test_normalize_address_rejects_malformed() {
        assert!(normalize_address("").is_none());
        assert!(normalize_address("4200000000000000000000000000000000000006").is_none());
        assert!(normalize_address("0x1234").is_none());
        assert!(normalize_address("0xzz00000000000000000000000000000000000006").is_none());
        assert!(normalize_address(ADDRESS).is_some());
    }

    #[test]
    fn test_abi_result_verified() {
        let body = json!({"status": "1", "message": "OK", "result": "[{\"type\":\"function\"}]"});
        assert!(abi_indicates_verified(&body));
    }

    #[test]
    fn test_abi_not_verified_message() {
        let body = json!({"status": "0", "message": "NOTOK", "result": NOT_VERIFIED_RESULT});
        assert!(!abi_indicates_verified(&body));
        let body = json!({"result": NOT_VERIFIED_RESULT});
        assert!(!abi_indicates_verified(&body));
    }

    #[test]
    fn test_abi_rate_limited_is_unverified() {
        let body = json!({"status": "0", "message": "NOTOK", "result": "Max rate limit reached"});
        assert!(!abi_indicates_verified(&body));
    }

    #[test]
    fn test_abi_empty_or_missing_result() {
        assert!(!abi_indicates_verified(&json!({"status": "1", "result": ""})));
        assert!(!abi_indicates_verified(&json!({"status": "1", "result": null})));
        assert!(!abi_indicates_verified(&json!({})));
    }
}

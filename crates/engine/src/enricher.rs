//! Verification enricher. Annotates emitted launches with contract verification status.

use std::collections::BTreeMap;
use std::future::Future;

use launchpad_common::types::AnnotatedLaunch;
use launchpad_sources::basescan::BasescanClient;

/// A source of contract verification status.
///
/// Implementations must not fail: any lookup problem reads as `false`.
pub trait ContractVerifier: Send + Sync {
    fn is_verified(&self, address: &str) -> impl Future<Output = bool> + Send;
}

impl ContractVerifier for BasescanClient {
    fn is_verified(&self, address: &str) -> impl Future<Output = bool> + Send {
        BasescanClient::is_verified(self, address)
    }
}

/// Distinct contract addresses from the emitted launches, lower-cased, in order
/// of first appearance, capped at `batch`.
pub fn collect_addresses(launches: &[AnnotatedLaunch], batch: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for addr in launches
        .iter()
        .filter_map(|l| l.record.contract_address.as_deref())
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
    {
        if seen.len() >= batch {
            break;
        }
        if !seen.contains(&addr) {
            seen.push(addr);
        }
    }
    seen
}

/// Look up every collected address concurrently and map address → verified.
pub async fn enrich<V: ContractVerifier>(
    verifier: &V,
    launches: &[AnnotatedLaunch],
    batch: usize,
) -> BTreeMap<String, bool> {
    let addresses = collect_addresses(launches, batch);
    let lookups = addresses.iter().map(|addr| verifier.is_verified(addr));
    let results = futures::future::join_all(lookups).await;

    let verified: BTreeMap<String, bool> = addresses.into_iter().zip(results).collect();
    tracing::info!(
        checked = verified.len(),
        verified = verified.values().filter(|v| **v).count(),
        "Contract verification enrichment complete"
    );
    verified
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use launchpad_common::types::{Chain, LaunchRecord, LaunchSource};

    /// Verifies addresses ending in an even hex digit and records every lookup.
    #[derive(Default)]
    struct FakeVerifier {
        calls: Mutex<Vec<String>>,
    }

    impl ContractVerifier for FakeVerifier {
        fn is_verified(&self, address: &str) -> impl Future<Output = bool> + Send {
            self.calls.lock().unwrap().push(address.to_string());
            let even = address
                .chars()
                .last()
                .and_then(|c| c.to_digit(16))
                .is_some_and(|d| d % 2 == 0);
            async move { even }
        }
    }

    fn launch(address: Option<&str>) -> AnnotatedLaunch {
        AnnotatedLaunch {
            record: LaunchRecord {
                source: LaunchSource::ClawnchToken,
                platform: Chain::Base,
                symbol: Some("SYM".to_string()),
                name: None,
                agent_name: Some("agent".to_string()),
                contract_address: address.map(String::from),
                launched_at: None,
                post_url: None,
                mc: None,
            },
            agent_launch_count: 1,
            is_first_launch: true,
        }
    }

    #[test]
    fn test_collect_dedupes_and_preserves_order() {
        let launches = vec![
            launch(Some("0xB2")),
            launch(None),
            launch(Some("0xa1")),
            launch(Some("0xb2")),
            launch(Some("0xc3")),
        ];
        assert_eq!(collect_addresses(&launches, 10), vec!["0xb2", "0xa1", "0xc3"]);
    }

    #[test]
    fn test_collect_respects_batch_cap() {
        let launches = vec![launch(Some("0x1")), launch(Some("0x2")), launch(Some("0x3"))];
        assert_eq!(collect_addresses(&launches, 2), vec!["0x1", "0x2"]);
        assert!(collect_addresses(&launches, 0).is_empty());
    }

    #[tokio::test]
    async fn test_enrich_maps_each_address() {
        let verifier = FakeVerifier::default();
        let launches = vec![launch(Some("0xA2")), launch(Some("0x13")), launch(Some("0xa2"))];

        let verified = enrich(&verifier, &launches, 10).await;

        assert_eq!(verified.len(), 2);
        assert_eq!(verified.get("0xa2"), Some(&true));
        assert_eq!(verified.get("0x13"), Some(&false));
        assert_eq!(verifier.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_enrich_without_addresses_is_empty() {
        let verifier = FakeVerifier::default();
        let verified = enrich(&verifier, &[launch(None)], 10).await;
        assert!(verified.is_empty());
        assert!(verifier.calls.lock().unwrap().is_empty());
    }
}

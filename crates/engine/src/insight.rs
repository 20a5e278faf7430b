//! Insight engine: per-agent launch counts and first-launch classification.
//!
//! Over the merged record set:
//! 1. Keep valid records (symbol plus launch time or contract address)
//! 2. Count launches per agent across the whole valid set
//! 3. Stable-sort by `launchedAt` descending (unparsable times sort as oldest)
//! 4. Window to `2 × max_results` candidates and annotate them
//! 5. Optionally keep first-time agents only, then cap at `max_results`
//! 6. Summarize agent counts over the whole valid set
//!
//! Counts and the summary never depend on the windowing in steps 4-5.

use std::cmp::Reverse;
use std::collections::HashMap;

use launchpad_common::types::{AnnotatedLaunch, LaunchRecord, LaunchpadInsight};

/// Knobs for a single insight pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightSettings {
    /// Maximum number of launches emitted
    pub max_results: usize,
    /// Emit only launches from agents seen exactly once
    pub first_time_agents_only: bool,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            max_results: 80,
            first_time_agents_only: true,
        }
    }
}

/// Output of an insight pass.
#[derive(Debug, Clone, Default)]
pub struct InsightOutcome {
    pub launches: Vec<AnnotatedLaunch>,
    pub insight: LaunchpadInsight,
}

pub struct InsightEngine;

impl InsightEngine {
    pub fn derive(records: Vec<LaunchRecord>, settings: &InsightSettings) -> InsightOutcome {
        let mut valid: Vec<LaunchRecord> = records.into_iter().filter(LaunchRecord::is_valid).collect();

        let counts = Self::agent_launch_counts(&valid);

        // sort_by_cached_key is stable, so equal timestamps keep input order
        valid.sort_by_cached_key(|r| Reverse(r.launched_at_millis()));
        valid.truncate(settings.max_results.saturating_mul(2));

        let annotated = valid.into_iter().map(|record| {
            let agent_launch_count = record
                .agent_key()
                .and_then(|key| counts.get(key).copied())
                .unwrap_or(0);
            AnnotatedLaunch {
                record,
                agent_launch_count,
                is_first_launch: agent_launch_count == 1,
            }
        });

        let launches: Vec<AnnotatedLaunch> = if settings.first_time_agents_only {
            annotated
                .filter(|launch| launch.is_first_launch)
                .take(settings.max_results)
                .collect()
        } else {
            annotated.take(settings.max_results).collect()
        };

        let insight = Self::summarize(&counts, settings, launches.len());

        tracing::debug!(
            total_agents = insight.total_agents,
            first_time_agents = insight.first_time_agents_count,
            emitted = launches.len(),
            "Derived launchpad insight"
        );

        InsightOutcome { launches, insight }
    }

    /// Launch count per trimmed agent name. Records without an agent are not counted.
    pub fn agent_launch_counts(records: &[LaunchRecord]) -> HashMap<String, u32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for key in records.iter().filter_map(LaunchRecord::agent_key) {
            *counts.entry(key.to_string()).or_default() += 1;
        }
        counts
    }

    fn summarize(
        counts: &HashMap<String, u32>,
        settings: &InsightSettings,
        emitted: usize,
    ) -> LaunchpadInsight {
        let total_agents = counts.len();
        let first_time_agents_count = counts.values().filter(|&&count| count == 1).count();
        LaunchpadInsight {
            total_agents,
            first_time_agents_count,
            repeat_agents_count: total_agents - first_time_agents_count,
            first_time_agents_only: settings.first_time_agents_only,
            new_agent_launches_count: emitted,
        }
    }
}

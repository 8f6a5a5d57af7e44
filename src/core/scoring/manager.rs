//! Provider score manager
//!
//! Raw counters are only ever incremented (until an explicit reset); the derived
//! [`ProviderStats`] are recomputed from them on every read.

use crate::core::router::error::RouterError;
use crate::core::state::ProviderStateMap;
use crate::core::types::{ProviderId, duration_ms};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::trace;

/// Raw per-provider counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProviderCounters {
    /// Successful calls
    pub successes: u64,
    /// All calls
    pub total: u64,
    /// Sum of call durations in milliseconds
    pub total_time_ms: f64,
    /// Failures since the last success
    pub retries: u64,
}

impl RawProviderCounters {
    fn stats(&self) -> ProviderStats {
        if self.total == 0 {
            return ProviderStats::default();
        }
        ProviderStats {
            success_rate: self.successes as f64 / self.total as f64,
            average_time: self.total_time_ms / self.total as f64,
            retry_count: self.retries,
        }
    }
}

/// Derived provider statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStats {
    /// Fraction of successful calls, in [0, 1]
    pub success_rate: f64,
    /// Mean call duration in milliseconds
    pub average_time: f64,
    /// Failures since the last success
    pub retry_count: u64,
}

impl ProviderStats {
    /// Ranking order: `Less` means `self` is the better provider
    ///
    /// Higher success rate wins, then lower average time, then fewer retries.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .success_rate
            .total_cmp(&self.success_rate)
            .then_with(|| self.average_time.total_cmp(&other.average_time))
            .then_with(|| self.retry_count.cmp(&other.retry_count))
    }
}

/// Per-provider success/latency scoring
#[derive(Debug, Default)]
pub struct ProviderScoreManager {
    counters: ProviderStateMap<RawProviderCounters>,
}

impl ProviderScoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one call
    pub fn update_score(&self, id: &str, success: bool, duration: Duration) {
        let duration_ms = duration_ms(duration);
        self.counters.update(id, |c| {
            c.total += 1;
            c.total_time_ms += duration_ms;
            if success {
                c.successes += 1;
                c.retries = 0;
            } else {
                c.retries += 1;
            }
            trace!(provider = id, success, total = c.total, retries = c.retries, "Score updated");
        });
    }

    /// Derived statistics; all zero for a provider with no recorded calls
    pub fn get_stats(&self, id: &str) -> ProviderStats {
        self.counters
            .get(id)
            .map(|c| c.stats())
            .unwrap_or_default()
    }

    /// Raw counters for a provider, if it has been touched
    pub fn raw_counters(&self, id: &str) -> Option<RawProviderCounters> {
        self.counters.get(id)
    }

    /// Derived statistics for every provider touched so far
    pub fn all_stats(&self) -> HashMap<ProviderId, ProviderStats> {
        self.counters
            .snapshot()
            .into_iter()
            .map(|(id, c)| (id, c.stats()))
            .collect()
    }

    /// Zero one provider's counters
    pub fn reset_stats(&self, id: &str) {
        self.counters
            .update_existing(id, |c| *c = RawProviderCounters::default());
    }

    /// Pick the best candidate
    ///
    /// Left-to-right fold: a later candidate replaces the current best only when it is
    /// strictly better, so full ties go to the earlier candidate.
    pub fn get_best_provider<S: AsRef<str>>(&self, candidates: &[S]) -> Result<ProviderId, RouterError> {
        let mut iter = candidates.iter().map(|c| {
            let id = c.as_ref();
            (id, self.get_stats(id))
        });

        let (mut best_id, mut best_stats) = iter.next().ok_or_else(|| {
            RouterError::InvalidArgument("candidate list must not be empty".to_string())
        })?;

        for (id, stats) in iter {
            if stats.rank_cmp(&best_stats) == Ordering::Less {
                best_id = id;
                best_stats = stats;
            }
        }

        Ok(best_id.to_string())
    }

    /// Order every candidate from best to worst
    ///
    /// Equivalent to repeatedly taking `get_best_provider` of the remaining candidates.
    /// Duplicates collapse to their first occurrence.
    pub fn rank<S: AsRef<str>>(&self, candidates: &[S]) -> Result<Vec<ProviderId>, RouterError> {
        if candidates.is_empty() {
            return Err(RouterError::InvalidArgument(
                "candidate list must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut scored: Vec<(ProviderId, ProviderStats)> = candidates
            .iter()
            .map(|c| c.as_ref())
            .filter(|id| seen.insert(id.to_string()))
            .map(|id| (id.to_string(), self.get_stats(id)))
            .collect();

        // Stable: ties keep input order
        scored.sort_by(|(_, a), (_, b)| a.rank_cmp(b));

        Ok(scored.into_iter().map(|(id, _)| id).collect())
    }
}

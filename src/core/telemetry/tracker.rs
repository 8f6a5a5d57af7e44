//! Telemetry tracker
//!
//! Per-provider state machine: `Healthy --failure--> Cooldown --(expiry or success)--> Healthy`.
//! Expiry is lazy: a cooldown is over as soon as the clock passes its end time, whether or
//! not the flag has been cleared yet. Reads clear expired flags as a side effect; the
//! optional sweep task does the same in the background.

use super::clock::{Clock, SystemClock};
use crate::core::state::ProviderStateMap;
use crate::core::types::{ProviderId, duration_ms, saturating_millis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cooldown applied after a failure when the caller does not pass one
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
struct TelemetryRecord {
    success_count: u64,
    failure_count: u64,
    total_requests: u64,
    average_response_time: f64,
    is_in_cooldown: bool,
    last_error: Option<String>,
    cooldown_end_time: Option<u64>,
    last_used: Option<u64>,
}

impl TelemetryRecord {
    fn clear_cooldown(&mut self) {
        self.is_in_cooldown = false;
        self.cooldown_end_time = None;
    }

    fn cooldown_expired(&self, now_ms: u64) -> bool {
        match self.cooldown_end_time {
            Some(end) => self.is_in_cooldown && now_ms > end,
            None => self.is_in_cooldown,
        }
    }
}

/// Telemetry snapshot for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryStats {
    pub provider_id: ProviderId,
    pub success_count: u64,
    pub failure_count: u64,
    pub total_requests: u64,
    /// Running average response time in milliseconds
    pub average_response_time: f64,
    pub is_in_cooldown: bool,
    pub last_error: Option<String>,
    /// Epoch milliseconds; only meaningful while `is_in_cooldown` is set
    pub cooldown_end_time: Option<u64>,
    /// Epoch milliseconds of the last recorded outcome
    pub last_used: Option<u64>,
}

impl TelemetryStats {
    /// Zero state of a provider that has never been touched
    pub fn empty(provider_id: impl Into<ProviderId>) -> Self {
        Self::from_record(provider_id.into(), TelemetryRecord::default())
    }

    fn from_record(provider_id: ProviderId, record: TelemetryRecord) -> Self {
        Self {
            provider_id,
            success_count: record.success_count,
            failure_count: record.failure_count,
            total_requests: record.total_requests,
            average_response_time: record.average_response_time,
            is_in_cooldown: record.is_in_cooldown,
            last_error: record.last_error,
            cooldown_end_time: record.cooldown_end_time,
            last_used: record.last_used,
        }
    }
}

/// Success/failure counters and cooldown windows per provider
#[derive(Debug)]
pub struct TelemetryTracker {
    records: ProviderStateMap<TelemetryRecord>,
    default_cooldown: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for TelemetryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl TelemetryTracker {
    /// Create a tracker using the system clock
    pub fn new(default_cooldown: Duration) -> Self {
        Self::with_clock(default_cooldown, Arc::new(SystemClock))
    }

    /// Create a tracker with an explicit time source
    pub fn with_clock(default_cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: ProviderStateMap::new(),
            default_cooldown,
            clock,
        }
    }

    pub fn default_cooldown(&self) -> Duration {
        self.default_cooldown
    }

    /// Current time according to the tracker's clock
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Record a successful call; clears any cooldown
    pub fn record_success(&self, id: &str, latency: Duration) {
        let now = self.clock.now_ms();
        let latency_ms = duration_ms(latency);

        self.records.update(id, |r| {
            let previous = r.total_requests as f64;
            r.success_count += 1;
            r.total_requests += 1;
            r.average_response_time =
                (r.average_response_time * previous + latency_ms) / r.total_requests as f64;
            if r.is_in_cooldown {
                info!(provider = id, "Provider left cooldown after success");
            }
            r.clear_cooldown();
            r.last_used = Some(now);
        });
    }

    /// Record a failed call and start a cooldown window
    ///
    /// Returns the cooldown end time in epoch milliseconds.
    pub fn record_failure<E>(&self, id: &str, error: &E, cooldown: Option<Duration>) -> u64
    where
        E: Display + ?Sized,
    {
        let now = self.clock.now_ms();
        let cooldown = cooldown.unwrap_or(self.default_cooldown);
        let end = now.saturating_add(saturating_millis(cooldown));
        let message = error.to_string();

        self.records.update(id, |r| {
            r.failure_count += 1;
            r.total_requests += 1;
            r.last_error = Some(message);
            r.is_in_cooldown = true;
            r.cooldown_end_time = Some(end);
            r.last_used = Some(now);
        });

        debug!(provider = id, cooldown_ms = saturating_millis(cooldown), "Provider entered cooldown");
        end
    }

    /// Whether the provider is inside an unexpired cooldown window
    pub fn is_cooling_down(&self, id: &str) -> bool {
        let now = self.clock.now_ms();
        self.records
            .update_existing(id, |r| {
                if r.cooldown_expired(now) {
                    r.clear_cooldown();
                }
                r.is_in_cooldown
            })
            .unwrap_or(false)
    }

    /// Time left in the provider's cooldown window
    pub fn cooldown_remaining(&self, id: &str) -> Option<Duration> {
        if !self.is_cooling_down(id) {
            return None;
        }
        let now = self.clock.now_ms();
        let end = self.records.get(id)?.cooldown_end_time?;
        Some(Duration::from_millis(end.saturating_sub(now)))
    }

    /// `success_count / total_requests`, or 0 with no requests
    pub fn get_success_rate(&self, id: &str) -> f64 {
        self.records
            .get(id)
            .filter(|r| r.total_requests > 0)
            .map(|r| r.success_count as f64 / r.total_requests as f64)
            .unwrap_or(0.0)
    }

    /// `failure_count / total_requests`, or 0 with no requests
    pub fn get_failure_rate(&self, id: &str) -> f64 {
        self.records
            .get(id)
            .filter(|r| r.total_requests > 0)
            .map(|r| r.failure_count as f64 / r.total_requests as f64)
            .unwrap_or(0.0)
    }

    /// Snapshot of one provider; zero state if it has never been touched
    pub fn get_stats(&self, id: &str) -> TelemetryStats {
        match self.records.get(id) {
            Some(record) => TelemetryStats::from_record(id.to_string(), record),
            None => TelemetryStats::empty(id),
        }
    }

    /// Snapshot of every provider touched so far
    pub fn get_all_stats(&self) -> HashMap<ProviderId, TelemetryStats> {
        self.records
            .snapshot()
            .into_iter()
            .map(|(id, record)| {
                let stats = TelemetryStats::from_record(id.clone(), record);
                (id, stats)
            })
            .collect()
    }

    /// Zero all counters and clear cooldown for one provider
    pub fn reset_stats(&self, id: &str) {
        self.records
            .update_existing(id, |r| *r = TelemetryRecord::default());
    }

    /// Clear every expired cooldown flag; returns the providers that were released
    pub fn sweep_expired_cooldowns(&self) -> Vec<ProviderId> {
        let now = self.clock.now_ms();
        let mut released: Vec<ProviderId> = self
            .records
            .ids()
            .into_iter()
            .filter(|id| {
                self.records
                    .update_existing(id, |r| {
                        let expired = r.cooldown_expired(now);
                        if expired {
                            r.clear_cooldown();
                        }
                        expired
                    })
                    .unwrap_or(false)
            })
            .collect();
        released.sort();

        if !released.is_empty() {
            debug!(providers = ?released, "Expired cooldowns cleared");
        }
        released
    }

    /// Run `sweep_expired_cooldowns` periodically
    pub fn start_cooldown_sweep(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                self.sweep_expired_cooldowns();
            }
        })
    }
}

//! Router events
//!
//! Every recorded outcome is published on a broadcast channel. Publishing never fails a
//! call: with no subscribers the event is dropped, and a lagging subscriber loses the
//! oldest events.

use crate::core::strategy::StrategyKind;
use crate::core::types::ProviderId;
use serde::Serialize;
use tokio::sync::broadcast;

/// Outcome notifications emitted by the router and the strategies
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RouterEvent {
    /// A provider call succeeded
    #[serde(rename_all = "camelCase")]
    ProviderSuccess {
        provider: ProviderId,
        request_id: String,
        latency_ms: f64,
    },

    /// A provider call failed and the provider entered cooldown
    #[serde(rename_all = "camelCase")]
    ProviderFailure {
        provider: ProviderId,
        request_id: String,
        error: String,
    },

    /// A strategy skipped a candidate because it was cooling down
    #[serde(rename_all = "camelCase")]
    ProviderSkipped {
        provider: ProviderId,
        request_id: String,
        cooldown_end_ms: Option<u64>,
    },

    /// A strategy ran out of candidates
    #[serde(rename_all = "camelCase")]
    Exhausted {
        strategy: StrategyKind,
        request_id: String,
    },
}

impl RouterEvent {
    pub fn request_id(&self) -> &str {
        match self {
            Self::ProviderSuccess { request_id, .. }
            | Self::ProviderFailure { request_id, .. }
            | Self::ProviderSkipped { request_id, .. }
            | Self::Exhausted { request_id, .. } => request_id,
        }
    }
}

/// Fan-out channel for [`RouterEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RouterEvent>,
}

impl EventBus {
    /// `capacity` must be greater than zero
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: RouterEvent) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

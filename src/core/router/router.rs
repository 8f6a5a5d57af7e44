//! Router core structure
//!
//! The router owns the provider registry and the two per-provider state stores. Every
//! dispatch goes through [`Router::send_prompt_to`] or [`Router::stream_prompt_to`], which
//! time the handler call and feed the outcome into telemetry and scoring before returning.

use super::config::RouterConfig;
use super::error::RouterError;
use super::events::{EventBus, RouterEvent};
use crate::core::providers::{ProviderError, ProviderHandler, ProviderRegistry};
use crate::core::scoring::ProviderScoreManager;
use crate::core::strategy::StrategyKind;
use crate::core::telemetry::TelemetryTracker;
use crate::core::types::{LlmResponse, PromptPayload, ProviderId, TokenSink, duration_ms};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Provider dispatcher
///
/// Cheap to share behind an `Arc`; all state is internally synchronized.
#[derive(Debug)]
pub struct Router {
    registry: ProviderRegistry,
    telemetry: Arc<TelemetryTracker>,
    scores: Arc<ProviderScoreManager>,
    events: EventBus,
    config: RouterConfig,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl Router {
    /// Create a router with fresh telemetry and scoring state
    pub fn new(config: RouterConfig) -> Self {
        let telemetry = Arc::new(TelemetryTracker::new(config.default_cooldown()));
        Self::with_components(config, telemetry, Arc::new(ProviderScoreManager::new()))
    }

    /// Create a router around existing state stores
    ///
    /// The tracker's own default cooldown applies to failures recorded through this router.
    pub fn with_components(
        config: RouterConfig,
        telemetry: Arc<TelemetryTracker>,
        scores: Arc<ProviderScoreManager>,
    ) -> Self {
        Self {
            registry: ProviderRegistry::new(),
            telemetry,
            scores,
            events: EventBus::new(config.event_capacity),
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn telemetry(&self) -> &Arc<TelemetryTracker> {
        &self.telemetry
    }

    pub fn scores(&self) -> &Arc<ProviderScoreManager> {
        &self.scores
    }

    /// Receive every [`RouterEvent`] published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
        self.events.subscribe()
    }

    pub(crate) fn publish(&self, event: RouterEvent) {
        self.events.publish(event);
    }

    // ========== Registration ==========

    /// Register a handler; an existing handler for the same id is replaced
    pub fn register_provider(&self, id: impl Into<ProviderId>, handler: Arc<dyn ProviderHandler>) {
        self.registry.register(id, handler);
    }

    pub fn unregister_provider(&self, id: &str) -> bool {
        self.registry.unregister(id).is_some()
    }

    /// Registered provider ids, sorted
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.registry.list()
    }

    /// Whether the provider's handler implements streaming; false for unknown ids
    pub fn supports_streaming(&self, id: &str) -> bool {
        self.registry
            .get(id)
            .map(|handler| handler.supports_streaming())
            .unwrap_or(false)
    }

    fn handler(&self, id: &str) -> Result<Arc<dyn ProviderHandler>, RouterError> {
        self.registry
            .get(id)
            .ok_or_else(|| RouterError::ProviderNotRegistered(id.to_string()))
    }

    // ========== Dispatch ==========

    /// Send to the provider named by `payload.provider_id`
    pub async fn send_prompt(&self, payload: &PromptPayload) -> Result<LlmResponse, RouterError> {
        let id = Self::target(payload)?;
        self.send_prompt_to(id, payload).await
    }

    /// Send to a caller-specified provider and record the outcome
    pub async fn send_prompt_to(
        &self,
        id: &str,
        payload: &PromptPayload,
    ) -> Result<LlmResponse, RouterError> {
        let handler = self.handler(id)?;
        debug!(provider = id, request_id = %payload.request_id, "Dispatching prompt");

        let started = Instant::now();
        let result = handler.send_prompt(payload).await;
        self.record_outcome(id, &payload.request_id, started, result)
    }

    /// Stream from the provider named by `payload.provider_id`
    pub async fn stream_prompt(
        &self,
        payload: &PromptPayload,
        on_token: TokenSink,
    ) -> Result<(), RouterError> {
        let id = Self::target(payload)?;
        self.stream_prompt_to(id, payload, on_token).await
    }

    /// Stream from a caller-specified provider
    ///
    /// Tokens go straight to `on_token`; the outcome is recorded once the handler's
    /// stream settles, regardless of how many tokens were emitted.
    pub async fn stream_prompt_to(
        &self,
        id: &str,
        payload: &PromptPayload,
        on_token: TokenSink,
    ) -> Result<(), RouterError> {
        let handler = self.handler(id)?;
        debug!(provider = id, request_id = %payload.request_id, "Dispatching streamed prompt");

        let started = Instant::now();
        let result = handler.stream_prompt(payload, on_token).await;
        self.record_outcome(id, &payload.request_id, started, result)
    }

    /// Notify every registered handler that `request_id` should stop
    pub fn cancel(&self, request_id: &str) {
        let handlers = self.registry.handlers();
        debug!(request_id, handlers = handlers.len(), "Broadcasting cancel");
        for (_, handler) in handlers {
            handler.cancel(request_id);
        }
    }

    fn target(payload: &PromptPayload) -> Result<&str, RouterError> {
        payload.provider_id.as_deref().ok_or_else(|| {
            RouterError::InvalidArgument("payload has no provider_id".to_string())
        })
    }

    fn record_outcome<T>(
        &self,
        id: &str,
        request_id: &str,
        started: Instant,
        result: Result<T, ProviderError>,
    ) -> Result<T, RouterError> {
        let latency = started.elapsed();

        match result {
            Ok(value) => {
                self.telemetry.record_success(id, latency);
                self.scores.update_score(id, true, latency);

                let latency_ms = duration_ms(latency);
                info!(provider = id, request_id, latency_ms, "Provider call succeeded");
                self.publish(RouterEvent::ProviderSuccess {
                    provider: id.to_string(),
                    request_id: request_id.to_string(),
                    latency_ms,
                });
                Ok(value)
            }
            Err(error) => {
                self.telemetry.record_failure(id, &error, None);
                self.scores.update_score(id, false, latency);

                warn!(provider = id, request_id, error = %error, "Provider call failed");
                self.publish(RouterEvent::ProviderFailure {
                    provider: id.to_string(),
                    request_id: request_id.to_string(),
                    error: error.to_string(),
                });
                Err(RouterError::ProviderCallFailure {
                    provider: id.to_string(),
                    source: error,
                })
            }
        }
    }

    // ========== Candidate selection ==========

    /// Rank candidates best-first by score, cooling providers included
    ///
    /// An empty `candidates` slice means every registered provider. Unknown ids fail
    /// with `ProviderNotRegistered` before any state is read.
    pub fn rank_candidates(&self, candidates: &[ProviderId]) -> Result<Vec<ProviderId>, RouterError> {
        let candidates = if candidates.is_empty() {
            self.registry.list()
        } else {
            if let Some(unknown) = candidates.iter().find(|id| !self.registry.contains(id)) {
                return Err(RouterError::ProviderNotRegistered(unknown.clone()));
            }
            candidates.to_vec()
        };

        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        self.scores.rank(&candidates)
    }

    /// Whether the provider may be tried now
    ///
    /// A cooling provider is logged and published as skipped for `request_id`.
    pub fn admit(&self, id: &str, request_id: &str) -> bool {
        if !self.telemetry.is_cooling_down(id) {
            return true;
        }

        let cooldown_end_ms = self.telemetry.get_stats(id).cooldown_end_time;
        warn!(provider = id, request_id, ?cooldown_end_ms, "Skipping provider in cooldown");
        self.publish(RouterEvent::ProviderSkipped {
            provider: id.to_string(),
            request_id: request_id.to_string(),
            cooldown_end_ms,
        });
        false
    }

    /// Build the exhaustion error and announce it
    pub(crate) fn exhausted(
        &self,
        strategy: StrategyKind,
        request_id: &str,
        attempted: Vec<ProviderId>,
        skipped: Vec<ProviderId>,
    ) -> RouterError {
        warn!(
            %strategy,
            request_id,
            ?attempted,
            ?skipped,
            "All providers exhausted"
        );
        self.publish(RouterEvent::Exhausted {
            strategy,
            request_id: request_id.to_string(),
        });
        RouterError::AllProvidersExhausted {
            strategy,
            attempted,
            skipped,
        }
    }
}

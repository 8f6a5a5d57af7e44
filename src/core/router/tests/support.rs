//! Scripted provider handlers shared by router and strategy tests

use crate::core::providers::{ProviderError, ProviderHandler};
use crate::core::router::{Router, RouterConfig};
use crate::core::scoring::ProviderScoreManager;
use crate::core::telemetry::{ManualClock, TelemetryTracker};
use crate::core::types::{LlmResponse, PromptPayload, StreamToken, TokenSink};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) const START_MS: u64 = 1_700_000_000_000;

/// Provider whose outcomes are fixed up front
///
/// Scripted outcomes are consumed first; after that every call yields the default.
#[derive(Debug)]
pub(crate) struct ScriptedProvider {
    default: Result<String, ProviderError>,
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    delay: Duration,
    stream_tokens: Option<Vec<String>>,
    stream_break: Option<(usize, String)>,
    calls: AtomicUsize,
    cancelled: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(default: Result<String, ProviderError>) -> Self {
        Self {
            default,
            script: Mutex::new(VecDeque::new()),
            delay: Duration::ZERO,
            stream_tokens: None,
            stream_break: None,
            calls: AtomicUsize::new(0),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn ok(output: &str) -> Self {
        Self::new(Ok(output.to_string()))
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::new(Err(ProviderError::other(message)))
    }

    /// Fail the first `n` calls before falling back to the default
    pub(crate) fn failing_first(mut self, n: usize, message: &str) -> Self {
        let script = self.script.get_mut();
        for _ in 0..n {
            script.push_back(Err(ProviderError::other(message)));
        }
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enable streaming; a successful stream emits `tokens` then the final token
    pub(crate) fn streaming(mut self, tokens: &[&str]) -> Self {
        self.stream_tokens = Some(tokens.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Fail the stream with `message` after emitting its first `after` tokens
    pub(crate) fn breaking_after(mut self, after: usize, message: &str) -> Self {
        self.stream_break = Some((after, message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().clone()
    }

    async fn next_outcome(&self) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let scripted = self.script.lock().pop_front();
        scripted.unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl ProviderHandler for ScriptedProvider {
    async fn send_prompt(&self, payload: &PromptPayload) -> Result<LlmResponse, ProviderError> {
        let output = self.next_outcome().await?;
        Ok(LlmResponse::new(payload.request_id.clone(), output))
    }

    async fn stream_prompt(
        &self,
        payload: &PromptPayload,
        on_token: TokenSink,
    ) -> Result<(), ProviderError> {
        let Some(tokens) = &self.stream_tokens else {
            return Err(ProviderError::StreamingUnsupported);
        };
        self.next_outcome().await?;
        let limit = self.stream_break.as_ref().map_or(tokens.len(), |(after, _)| *after);
        for token in tokens.iter().take(limit) {
            on_token.emit(StreamToken::chunk(payload.request_id.clone(), token.clone()));
        }
        if let Some((_, message)) = &self.stream_break {
            return Err(ProviderError::other(message.as_str()));
        }
        on_token.emit(StreamToken::final_token(payload.request_id.clone()));
        Ok(())
    }

    fn cancel(&self, request_id: &str) {
        self.cancelled.lock().push(request_id.to_string());
    }

    fn supports_streaming(&self) -> bool {
        self.stream_tokens.is_some()
    }
}

/// Router driven by a manual clock
pub(crate) fn manual_router(config: RouterConfig) -> (Arc<Router>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let telemetry = Arc::new(TelemetryTracker::with_clock(
        config.default_cooldown(),
        clock.clone(),
    ));
    let router = Router::with_components(config, telemetry, Arc::new(ProviderScoreManager::new()));
    (Arc::new(router), clock)
}

/// Register `provider` under `id` and hand back a typed reference for assertions
pub(crate) fn register(
    router: &Router,
    id: &str,
    provider: ScriptedProvider,
) -> Arc<ScriptedProvider> {
    let provider = Arc::new(provider);
    router.register_provider(id, provider.clone());
    provider
}

/// Token sink collecting everything it receives
pub(crate) fn collecting_sink() -> (TokenSink, Arc<Mutex<Vec<StreamToken>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink_received = received.clone();
    let sink = TokenSink::new(move |token| sink_received.lock().push(token));
    (sink, received)
}

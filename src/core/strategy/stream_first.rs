//! Stream-first strategy
//!
//! Streaming-capable candidates are tried first, in rank order. Tokens are forwarded to the
//! caller's sink as they arrive and accumulated into the output. If no streamed call
//! succeeds the remaining candidates are tried sequentially; a non-streamed result is then
//! delivered to the sink as one chunk followed by the final token.
//!
//! A stream that fails after delivering a chunk has committed the request: the run ends as
//! exhausted and no other provider's answer is appended to the caller's tokens.

use super::sequential::send_in_order;
use super::types::{AttemptTrail, StrategyInput, StrategyKind, StrategyOutput};
use super::DispatchStrategy;
use crate::core::router::{Router, RouterError};
use crate::core::types::{ProviderId, StreamToken, TokenSink};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

/// Text received from one streaming attempt
#[derive(Debug, Default)]
struct StreamCapture {
    text: String,
    chunks: usize,
}

/// Prefers streaming providers, then falls back to sequential semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamFirstStrategy;

#[async_trait]
impl DispatchStrategy for StreamFirstStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StreamFirst
    }

    async fn run(
        &self,
        router: &Arc<Router>,
        input: StrategyInput,
    ) -> Result<StrategyOutput, RouterError> {
        let request_id = input.payload.request_id.clone();
        let ranked = router.rank_candidates(&input.candidates)?;
        let (streaming, rest): (Vec<ProviderId>, Vec<ProviderId>) = ranked
            .into_iter()
            .partition(|id| router.supports_streaming(id));
        let mut trail = AttemptTrail::default();

        let mut streaming = streaming.into_iter();
        while let Some(id) = streaming.next() {
            if !router.admit(&id, &request_id) {
                trail.skipped.push(id);
                continue;
            }

            trail.attempted.push(id.clone());
            let capture = Arc::new(Mutex::new(StreamCapture::default()));
            let sink = capturing_sink(capture.clone(), input.on_token.clone());

            let result = router.stream_prompt_to(&id, &input.payload, sink).await;
            let capture = std::mem::take(&mut *capture.lock());
            match result {
                Ok(()) => {
                    let output = capture.text;
                    return Ok(StrategyOutput {
                        strategy: self.kind(),
                        request_id,
                        provider_id: id,
                        output,
                        attempts: trail.attempted,
                        streamed: true,
                    });
                }
                Err(e) if capture.chunks > 0 => {
                    warn!(
                        provider = %id,
                        request_id = %request_id,
                        chunks = capture.chunks,
                        error = %e,
                        "Stream failed after delivering tokens"
                    );
                    trail.skipped.extend(streaming.by_ref());
                    trail.skipped.extend(rest.iter().cloned());
                    return Err(router.exhausted(
                        self.kind(),
                        &request_id,
                        trail.attempted,
                        trail.skipped,
                    ));
                }
                Err(e) if e.is_recoverable() => continue,
                Err(e) => return Err(e),
            }
        }

        match send_in_order(router, &input.payload, &rest, &mut trail).await? {
            Some((provider_id, response)) => {
                if let Some(on_token) = &input.on_token {
                    on_token.emit(StreamToken::chunk(&request_id, response.output.clone()));
                    on_token.emit(StreamToken::final_token(&request_id));
                }
                Ok(StrategyOutput {
                    strategy: self.kind(),
                    request_id,
                    provider_id,
                    output: response.output,
                    attempts: trail.attempted,
                    streamed: false,
                })
            }
            None => Err(router.exhausted(self.kind(), &request_id, trail.attempted, trail.skipped)),
        }
    }
}

fn capturing_sink(capture: Arc<Mutex<StreamCapture>>, forward: Option<TokenSink>) -> TokenSink {
    TokenSink::new(move |token: StreamToken| {
        {
            let mut capture = capture.lock();
            capture.text.push_str(&token.token);
            if !token.is_final {
                capture.chunks += 1;
            }
        }
        if let Some(forward) = &forward {
            forward.emit(token);
        }
    })
}

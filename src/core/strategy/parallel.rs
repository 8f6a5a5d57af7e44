//! Parallel strategy
//!
//! Every admitted candidate is called on its own task. The first success is returned and a
//! cancel for the request is broadcast; the losing tasks keep running to completion so their
//! outcomes are still recorded.
//!
//! With `max_parallel` set, only the best-ranked admitted candidates are called; the rest are
//! reported as skipped.

use super::types::{AttemptTrail, StrategyInput, StrategyKind, StrategyOutput};
use super::DispatchStrategy;
use crate::core::router::{Router, RouterError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Races all admitted candidates; first success wins
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelStrategy;

#[async_trait]
impl DispatchStrategy for ParallelStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Parallel
    }

    async fn run(
        &self,
        router: &Arc<Router>,
        input: StrategyInput,
    ) -> Result<StrategyOutput, RouterError> {
        let request_id = input.payload.request_id.clone();
        let ranked = router.rank_candidates(&input.candidates)?;
        let mut trail = AttemptTrail::default();

        let mut live = Vec::with_capacity(ranked.len());
        for id in ranked {
            if router.admit(&id, &request_id) {
                live.push(id);
            } else {
                trail.skipped.push(id);
            }
        }
        if let Some(max) = router.config().max_parallel.filter(|&max| live.len() > max) {
            trail.skipped.extend(live.split_off(max));
        }

        if live.is_empty() {
            return Err(router.exhausted(self.kind(), &request_id, trail.attempted, trail.skipped));
        }

        debug!(request_id = %request_id, fan_out = live.len(), "Starting parallel dispatch");

        // Sized so a finishing task never waits on the receiver
        let (tx, mut rx) = mpsc::channel(live.len());
        for id in live {
            trail.attempted.push(id.clone());
            let router = Arc::clone(router);
            let payload = input.payload.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = router.send_prompt_to(&id, &payload).await;
                let _ = tx.send((id, result)).await;
            });
        }
        drop(tx);

        while let Some((id, result)) = rx.recv().await {
            match result {
                Ok(response) => {
                    router.cancel(&request_id);
                    return Ok(StrategyOutput {
                        strategy: self.kind(),
                        request_id,
                        provider_id: id,
                        output: response.output,
                        attempts: trail.attempted,
                        streamed: false,
                    });
                }
                Err(e) if e.is_recoverable() => continue,
                Err(e) => {
                    router.cancel(&request_id);
                    return Err(e);
                }
            }
        }

        Err(router.exhausted(self.kind(), &request_id, trail.attempted, trail.skipped))
    }
}

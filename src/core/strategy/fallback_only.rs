//! Fallback-only strategy

use super::types::{AttemptTrail, StrategyInput, StrategyKind, StrategyOutput};
use super::DispatchStrategy;
use crate::core::router::{Router, RouterError};
use async_trait::async_trait;
use std::sync::Arc;

/// Primary plus one fallback
const MAX_CANDIDATES: usize = 2;

/// Tries the scored best, then at most the single next-best
///
/// A primary in cooldown counts as its failure, so the next-best is tried instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackOnlyStrategy;

#[async_trait]
impl DispatchStrategy for FallbackOnlyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FallbackOnly
    }

    async fn run(
        &self,
        router: &Arc<Router>,
        input: StrategyInput,
    ) -> Result<StrategyOutput, RouterError> {
        let request_id = input.payload.request_id.clone();
        let ranked = router.rank_candidates(&input.candidates)?;
        let mut trail = AttemptTrail::default();

        for id in ranked.into_iter().take(MAX_CANDIDATES) {
            if !router.admit(&id, &request_id) {
                trail.skipped.push(id);
                continue;
            }

            trail.attempted.push(id.clone());
            match router.send_prompt_to(&id, &input.payload).await {
                Ok(response) => {
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
                Err(e) => return Err(e),
            }
        }

        Err(router.exhausted(self.kind(), &request_id, trail.attempted, trail.skipped))
    }
}

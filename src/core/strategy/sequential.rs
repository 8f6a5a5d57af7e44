//! Sequential strategy

use super::types::{AttemptTrail, StrategyInput, StrategyKind, StrategyOutput};
use super::DispatchStrategy;
use crate::core::router::{Router, RouterError};
use crate::core::types::{LlmResponse, PromptPayload, ProviderId};
use async_trait::async_trait;
use std::sync::Arc;

/// Tries ranked candidates one at a time, stopping at the first success
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStrategy;

#[async_trait]
impl DispatchStrategy for SequentialStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    async fn run(
        &self,
        router: &Arc<Router>,
        input: StrategyInput,
    ) -> Result<StrategyOutput, RouterError> {
        let request_id = input.payload.request_id.clone();
        let ranked = router.rank_candidates(&input.candidates)?;
        let mut trail = AttemptTrail::default();

        match send_in_order(router, &input.payload, &ranked, &mut trail).await? {
            Some((provider_id, response)) => Ok(StrategyOutput {
                strategy: self.kind(),
                request_id,
                provider_id,
                output: response.output,
                attempts: trail.attempted,
                streamed: false,
            }),
            None => Err(router.exhausted(self.kind(), &request_id, trail.attempted, trail.skipped)),
        }
    }
}

/// Call each admitted candidate in order until one succeeds
///
/// A candidate's outcome is recorded before the next one is tried. Returns `None` when
/// every candidate failed or was skipped; non-recoverable errors propagate at once.
pub(crate) async fn send_in_order(
    router: &Router,
    payload: &PromptPayload,
    candidates: &[ProviderId],
    trail: &mut AttemptTrail,
) -> Result<Option<(ProviderId, LlmResponse)>, RouterError> {
    for id in candidates {
        if !router.admit(id, &payload.request_id) {
            trail.skipped.push(id.clone());
            continue;
        }

        trail.attempted.push(id.clone());
        match router.send_prompt_to(id, payload).await {
            Ok(response) => return Ok(Some((id.clone(), response))),
            Err(e) if e.is_recoverable() => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

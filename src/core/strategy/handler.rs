//! Strategy handler

use super::fallback_only::FallbackOnlyStrategy;
use super::parallel::ParallelStrategy;
use super::sequential::SequentialStrategy;
use super::stream_first::StreamFirstStrategy;
use super::types::{StrategyInput, StrategyKind, StrategyOutput};
use super::DispatchStrategy;
use crate::core::router::{Router, RouterError};
use std::sync::Arc;
use tracing::debug;

/// A strategy bound to a router
///
/// All four strategies share this call shape, so callers never branch on the kind.
#[derive(Debug, Clone)]
pub struct StrategyHandler {
    kind: StrategyKind,
    router: Arc<Router>,
}

impl StrategyHandler {
    pub fn new(kind: StrategyKind, router: Arc<Router>) -> Self {
        Self { kind, router }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Strategy id, e.g. `"fallback-only"`
    pub fn id(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub async fn run(&self, input: StrategyInput) -> Result<StrategyOutput, RouterError> {
        debug!(
            strategy = %self.kind,
            request_id = %input.payload.request_id,
            candidates = input.candidates.len(),
            "Running strategy"
        );

        match self.kind {
            StrategyKind::Sequential => SequentialStrategy.run(&self.router, input).await,
            StrategyKind::Parallel => ParallelStrategy.run(&self.router, input).await,
            StrategyKind::FallbackOnly => FallbackOnlyStrategy.run(&self.router, input).await,
            StrategyKind::StreamFirst => StreamFirstStrategy.run(&self.router, input).await,
        }
    }
}

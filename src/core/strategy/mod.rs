//! Dispatch strategies
//!
//! A strategy decides which sequence of provider calls produces the output for one request.
//! The set is closed: [`StrategyKind`] names the four policies and [`StrategyHandler`]
//! dispatches to them. [`AgentStrategyRouter`] maps caller ids to a handler.
//!
//! Every strategy ranks its candidates with the score manager first and then skips those in
//! cooldown, so cooldown never influences the ranking itself.

mod fallback_only;
mod handler;
mod parallel;
mod selector;
mod sequential;
mod stream_first;
mod types;


pub use fallback_only::FallbackOnlyStrategy;
pub use handler::StrategyHandler;
pub use parallel::ParallelStrategy;
pub use selector::{AgentStrategyRouter, DEFAULT_STRATEGY};
pub use sequential::SequentialStrategy;
pub use stream_first::StreamFirstStrategy;
pub use types::{StrategyInput, StrategyKind, StrategyOutput};

use crate::core::router::{Router, RouterError};
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface of the dispatch policies
#[async_trait]
pub trait DispatchStrategy: Send + Sync {
    /// Id stamped on every output
    fn kind(&self) -> StrategyKind;

    /// Produce an output for `input` using the router's providers
    ///
    /// Fails with `AllProvidersExhausted` once every candidate has failed or been skipped.
    async fn run(
        &self,
        router: &Arc<Router>,
        input: StrategyInput,
    ) -> Result<StrategyOutput, RouterError>;
}

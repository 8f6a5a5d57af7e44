//! # llm-relay
//!
//! In-process routing for interchangeable LLM providers: pick the healthiest candidate,
//! fall back on failure and record every outcome to improve the next choice.
//!
//! ## Features
//!
//! - **Health scoring**: per-provider success rate, average latency and retry streaks
//! - **Cooldown tracking**: a failed provider is skipped until its cooldown window passes
//! - **Dispatch strategies**: sequential, parallel, fallback-only and stream-first
//! - **Per-agent selection**: callers are mapped to a strategy with a fallback-only default
//! - **Outcome events**: success, failure, skip and exhaustion notifications over a broadcast bus
//!
//! Vendor adapters are not part of this crate; anything implementing [`ProviderHandler`]
//! can be registered.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_relay::{
//!     AgentStrategyRouter, LlmResponse, PromptPayload, ProviderError, ProviderHandler, Router,
//!     RouterConfig, StrategyInput,
//! };
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl ProviderHandler for Echo {
//!     async fn send_prompt(&self, payload: &PromptPayload) -> Result<LlmResponse, ProviderError> {
//!         Ok(LlmResponse::new(payload.request_id.clone(), payload.text.clone()))
//!     }
//!
//!     fn cancel(&self, _request_id: &str) {}
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = Arc::new(Router::new(RouterConfig::default()));
//!     router.register_provider("echo", Arc::new(Echo));
//!
//!     let agents = AgentStrategyRouter::new(router);
//!     let output = agents
//!         .select_agent_strategy("agent1")
//!         .run(StrategyInput::new(PromptPayload::new("Hello")))
//!         .await?;
//!
//!     println!("{} answered via {}: {}", output.provider_id, output.strategy, output.output);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{LoggingConfig, RelayConfig};
pub use utils::error::{RelayError, Result};
pub use utils::logging::init_logging;

pub use core::providers::{ProviderError, ProviderHandler, ProviderRegistry};
pub use core::router::{Router, RouterConfig, RouterError, RouterEvent};
pub use core::scoring::{ProviderScoreManager, ProviderStats, RawProviderCounters};
pub use core::state::ProviderStateMap;
pub use core::strategy::{
    AgentStrategyRouter, DEFAULT_STRATEGY, DispatchStrategy, StrategyHandler, StrategyInput,
    StrategyKind, StrategyOutput,
};
pub use core::telemetry::{
    Clock, DEFAULT_COOLDOWN, ManualClock, SystemClock, TelemetryStats, TelemetryTracker,
};
pub use core::types::{LlmResponse, PromptPayload, ProviderId, StreamToken, TokenSink};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

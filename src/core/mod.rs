//! Core routing engine
//!
//! Leaf-first: `types` and `state` are shared building blocks, `scoring` and `telemetry`
//! hold per-provider health, `router` dispatches and records outcomes, and `strategy`
//! decides how candidates are tried for one request.

pub mod providers;
pub mod router;
pub mod scoring;
pub mod state;
pub mod strategy;
pub mod telemetry;
pub mod types;

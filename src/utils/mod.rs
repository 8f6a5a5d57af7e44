//! Utility modules
//!
//! - `error` - Crate-level error type and `Result` alias
//! - `logging` - Tracing subscriber setup

pub mod error;
pub mod logging;

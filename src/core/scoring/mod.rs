//! Provider health scoring
//!
//! Success-rate and latency statistics per provider, plus the deterministic
//! "best of N" comparator used to rank candidates.

pub mod manager;


pub use manager::{ProviderScoreManager, ProviderStats, RawProviderCounters};

//! Router configuration
//!
//! ## Defaults
//!
//! - `default_cooldown_ms`: 60000
//! - `max_parallel`: unbounded
//! - `event_capacity`: 256

use crate::core::types::saturating_millis;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_cooldown_ms() -> u64 {
    60_000
}

fn default_event_capacity() -> usize {
    256
}

/// Router configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Cooldown applied after a failed call (default: 60000)
    #[serde(default = "default_cooldown_ms")]
    pub default_cooldown_ms: u64,

    /// Maximum concurrent calls issued by the parallel strategy (default: all candidates)
    #[serde(default)]
    pub max_parallel: Option<usize>,

    /// Buffered events per subscriber before the oldest are dropped (default: 256)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_cooldown_ms: default_cooldown_ms(),
            max_parallel: None,
            event_capacity: default_event_capacity(),
        }
    }
}

impl RouterConfig {
    pub fn default_cooldown(&self) -> Duration {
        Duration::from_millis(self.default_cooldown_ms)
    }

    /// Set the default cooldown (builder pattern)
    pub fn with_default_cooldown(mut self, cooldown: Duration) -> Self {
        self.default_cooldown_ms = saturating_millis(cooldown);
        self
    }

    /// Cap the parallel fan-out (builder pattern)
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = Some(max_parallel);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.event_capacity == 0 {
            return Err("router.event_capacity must be greater than 0".to_string());
        }
        if self.max_parallel == Some(0) {
            return Err("router.max_parallel must be greater than 0 when set".to_string());
        }
        Ok(())
    }

    /// Merge router configurations; non-default values in `other` win
    pub fn merge(mut self, other: Self) -> Self {
        if other.default_cooldown_ms != default_cooldown_ms() {
            self.default_cooldown_ms = other.default_cooldown_ms;
        }
        if other.max_parallel.is_some() {
            self.max_parallel = other.max_parallel;
        }
        if other.event_capacity != default_event_capacity() {
            self.event_capacity = other.event_capacity;
        }
        self
    }
}

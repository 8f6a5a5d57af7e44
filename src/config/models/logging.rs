//! Logging configuration

use serde::{Deserialize, Serialize};

fn default_level() -> String {
    "info".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives, e.g. `info` or `llm_relay=debug` (default: info)
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
    /// Include the event target in each line
    #[serde(default)]
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            with_target: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("logging.level must not be empty".to_string());
        }
        Ok(())
    }

    /// Merge logging configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.level != default_level() {
            self.level = other.level;
        }
        if other.json {
            self.json = other.json;
        }
        if other.with_target {
            self.with_target = other.with_target;
        }
        self
    }
}

//! Configuration management for the relay
//!
//! A single YAML document configures the router, extra agent-to-strategy mappings and
//! logging. Every section and field is optional.
//!
//! ```yaml
//! router:
//!   default_cooldown_ms: 30000
//!   max_parallel: 3
//! agents:
//!   reviewer: sequential
//!   summarizer: stream-first
//! logging:
//!   level: llm_relay=debug
//! ```

pub mod models;

pub use models::*;

use crate::core::router::{Router, RouterConfig};
use crate::core::strategy::{AgentStrategyRouter, StrategyKind};
use crate::utils::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Main configuration struct for the relay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub router: RouterConfig,
    /// Agent id to strategy; layered over the built-in agent table
    #[serde(default)]
    pub agents: BTreeMap<String, StrategyKind>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Load and validate configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document is the default configuration
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.router
            .validate()
            .map_err(|e| RelayError::Config(format!("Router config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| RelayError::Config(format!("Logging config error: {}", e)))?;

        if let Some(agent) = self.agents.keys().find(|agent| agent.trim().is_empty()) {
            return Err(RelayError::Config(format!(
                "Agent config error: empty agent id {:?}",
                agent
            )));
        }
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.router = self.router.merge(other.router);
        self.agents.extend(other.agents);
        self.logging = self.logging.merge(other.logging);
        self
    }

    /// Router built from the `router` section
    pub fn build_router(&self) -> Router {
        Router::new(self.router.clone())
    }

    /// Agent selector over `router` with the `agents` section applied
    pub fn agent_router(&self, router: Arc<Router>) -> AgentStrategyRouter {
        AgentStrategyRouter::with_overrides(router, &self.agents)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RelayError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

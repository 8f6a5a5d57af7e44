//! Agent to strategy mapping

use super::handler::StrategyHandler;
use super::types::StrategyKind;
use crate::core::router::Router;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Strategy for agent ids missing from the table
pub const DEFAULT_STRATEGY: StrategyKind = StrategyKind::FallbackOnly;

const BUILTIN_AGENTS: [(&str, StrategyKind); 3] = [
    ("agent1", StrategyKind::Sequential),
    ("agent2", StrategyKind::Parallel),
    ("stream", StrategyKind::StreamFirst),
];

/// Maps caller/agent ids to a dispatch strategy
///
/// Unknown ids resolve to [`DEFAULT_STRATEGY`]; that is the explicit default, not an error.
#[derive(Debug, Clone)]
pub struct AgentStrategyRouter {
    router: Arc<Router>,
    table: HashMap<String, StrategyKind>,
}

impl AgentStrategyRouter {
    /// Built-in table only
    pub fn new(router: Arc<Router>) -> Self {
        let table = BUILTIN_AGENTS
            .iter()
            .map(|(agent, kind)| (agent.to_string(), *kind))
            .collect();
        Self { router, table }
    }

    /// Built-in table with `overrides` layered on top
    pub fn with_overrides(router: Arc<Router>, overrides: &BTreeMap<String, StrategyKind>) -> Self {
        let mut selector = Self::new(router);
        for (agent, kind) in overrides {
            selector.set_agent_strategy(agent.clone(), *kind);
        }
        selector
    }

    pub fn set_agent_strategy(&mut self, agent_id: impl Into<String>, kind: StrategyKind) {
        self.table.insert(agent_id.into(), kind);
    }

    /// Strategy kind for an agent id
    pub fn strategy_for(&self, agent_id: &str) -> StrategyKind {
        self.table.get(agent_id).copied().unwrap_or(DEFAULT_STRATEGY)
    }

    pub fn select_agent_strategy(&self, agent_id: &str) -> StrategyHandler {
        let kind = self.strategy_for(agent_id);
        debug!(agent = agent_id, strategy = %kind, "Selected strategy");
        StrategyHandler::new(kind, Arc::clone(&self.router))
    }

    /// Known agent ids and their strategies, sorted by id
    pub fn agents(&self) -> Vec<(String, StrategyKind)> {
        let mut agents: Vec<_> = self
            .table
            .iter()
            .map(|(agent, kind)| (agent.clone(), *kind))
            .collect();
        agents.sort_by(|a, b| a.0.cmp(&b.0));
        agents
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }
}

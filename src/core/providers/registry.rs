//! Provider Registry
//!
//! Runtime map from provider id to handler

use super::ProviderHandler;
use crate::core::types::ProviderId;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Provider registry keyed by provider id
///
/// Registration is last-writer-wins: registering an id again replaces its handler.
#[derive(Default)]
pub struct ProviderRegistry {
    handlers: DashMap<ProviderId, Arc<dyn ProviderHandler>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Register a handler, replacing any previous handler for the same id
    pub fn register(&self, id: impl Into<ProviderId>, handler: Arc<dyn ProviderHandler>) {
        let id = id.into();
        if self.handlers.insert(id.clone(), handler).is_some() {
            debug!(provider = %id, "Provider handler replaced");
        } else {
            debug!(provider = %id, "Provider handler registered");
        }
    }

    /// Remove a handler
    pub fn unregister(&self, id: &str) -> Option<Arc<dyn ProviderHandler>> {
        self.handlers.remove(id).map(|(_, handler)| handler)
    }

    /// Get the handler for an id
    pub fn get(&self, id: &str) -> Option<Arc<dyn ProviderHandler>> {
        self.handlers.get(id).map(|entry| entry.value().clone())
    }

    /// Check if a provider is registered
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// List registered provider ids, sorted
    pub fn list(&self) -> Vec<ProviderId> {
        let mut ids: Vec<ProviderId> = self
            .handlers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    /// Snapshot of every registered handler
    pub fn handlers(&self) -> Vec<(ProviderId, Arc<dyn ProviderHandler>)> {
        self.handlers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list())
            .finish()
    }
}

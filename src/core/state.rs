//! Per-provider shared state
//!
//! `ProviderStateMap` is the concurrent map used by scoring and telemetry. Each
//! provider's record sits behind its own mutex inside a sharded `DashMap`, so updates
//! for one provider never serialize behind updates for another. Every update is scoped
//! to exactly one provider id.

use crate::core::types::ProviderId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Lazily populated map of provider id to a lock-guarded record
#[derive(Debug)]
pub struct ProviderStateMap<T> {
    entries: DashMap<ProviderId, Arc<Mutex<T>>>,
}

impl<T> Default for ProviderStateMap<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T: Default + Clone> ProviderStateMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-modify-write one provider's record, creating it on first touch
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> R {
        let entry = self.entry(id);
        let mut guard = entry.lock();
        f(&mut guard)
    }

    /// Read-modify-write an existing record; untouched ids are left absent
    pub fn update_existing<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let entry = self.entries.get(id).map(|e| e.value().clone())?;
        let mut guard = entry.lock();
        Some(f(&mut guard))
    }

    /// Copy of one provider's record, without creating it
    pub fn get(&self, id: &str) -> Option<T> {
        let entry = self.entries.get(id).map(|e| e.value().clone())?;
        let value = entry.lock().clone();
        Some(value)
    }

    /// Copy of every record touched so far
    pub fn snapshot(&self) -> HashMap<ProviderId, T> {
        let entries: Vec<(ProviderId, Arc<Mutex<T>>)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        entries
            .into_iter()
            .map(|(id, record)| {
                let value = record.lock().clone();
                (id, value)
            })
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // The record's Arc is cloned out so the shard lock is released before the
    // per-provider mutex is taken.
    fn entry(&self, id: &str) -> Arc<Mutex<T>> {
        if let Some(existing) = self.entries.get(id) {
            return existing.value().clone();
        }
        self.entries
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(T::default())))
            .value()
            .clone()
    }
}

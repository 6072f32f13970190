//! Single-writer store for the current style configuration
//!
//! Observers registered here are how persistence and the preview learn about
//! edits.

use crate::config::{parser, validator};
use crate::models::{Configuration, FieldPath, FieldValue};
use crate::services::path_mutator::{self, MutationError};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

type ConfigListener = Box<dyn Fn(&ConfigEvent, &Arc<Configuration>) + Send + Sync>;

/// Identifies an observer registered with [`ConfigStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Why the current configuration was replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// One leaf changed through the path mutator
    Mutated { path: String },
    /// Defaults restored
    Reset,
    /// A document was merged in; lists the top-level keys it replaced
    Imported { sections: Vec<String> },
    /// Whole configuration swapped by [`ConfigStore::set`]
    Replaced,
}

/// Owner of the current configuration snapshot
///
/// The store is the only writer. Every change builds a new [`Configuration`]
/// and swaps it in with one assignment, then notifies observers synchronously.
/// Snapshots handed out earlier are never modified.
pub struct ConfigStore {
    current: Arc<Configuration>,
    version: u64,
    listeners: Vec<(SubscriptionId, ConfigListener)>,
    next_subscription: u64,
}

impl ConfigStore {
    pub fn new(initial: Configuration) -> Self {
        Self {
            current: Arc::new(initial),
            version: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current immutable snapshot
    pub fn get(&self) -> Arc<Configuration> {
        Arc::clone(&self.current)
    }

    /// Number of accepted replacements since the store was created
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Swap in a whole configuration
    ///
    /// Fields outside their constraint are clamped or reset to their default
    /// before the snapshot is published.
    pub fn set(&mut self, mut config: Configuration) -> Arc<Configuration> {
        let rewritten = validator::normalize(&mut config);
        if !rewritten.is_empty() {
            debug!(fields = ?rewritten, "Normalized replacement configuration");
        }
        self.replace(config, ConfigEvent::Replaced)
    }

    /// Mutate one leaf; a rejected value keeps the current snapshot
    pub fn apply(
        &mut self,
        path: &FieldPath,
        value: &FieldValue,
    ) -> Result<Arc<Configuration>, MutationError> {
        let mutation = path_mutator::apply_detailed(&self.current, path, value)?;

        if mutation.previous == mutation.written {
            debug!(path = %path, "Value unchanged, keeping current configuration");
            return Ok(self.get());
        }

        debug!(
            path = %path,
            from = %mutation.previous,
            to = %mutation.written,
            adjusted = mutation.adjusted,
            "Applying field mutation"
        );
        Ok(self.replace(
            mutation.config,
            ConfigEvent::Mutated {
                path: path.dotted(),
            },
        ))
    }

    /// Discard every edit and return to the defaults
    pub fn reset(&mut self) -> Arc<Configuration> {
        info!("Resetting configuration to defaults");
        self.replace(Configuration::default(), ConfigEvent::Reset)
    }

    /// Merge an imported document one top-level section at a time
    pub fn import_merge(&mut self, partial: &Map<String, Value>) -> Arc<Configuration> {
        let report = parser::merge_document(&self.current, partial);
        info!(
            replaced = ?report.replaced,
            ignored = ?report.ignored,
            "Importing configuration document"
        );
        self.replace(
            report.config,
            ConfigEvent::Imported {
                sections: report.replaced,
            },
        )
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&ConfigEvent, &Arc<Configuration>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn replace(&mut self, config: Configuration, event: ConfigEvent) -> Arc<Configuration> {
        self.current = Arc::new(config);
        self.version += 1;

        for (_, listener) in &self.listeners {
            listener(&event, &self.current);
        }
        self.get()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

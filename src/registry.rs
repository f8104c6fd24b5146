//! Provider registry: id-keyed lookup and availability filtering.
//!
//! Holds the immutable set of registered providers. Carries no
//! per-request state, so one registry instance is safely shared across
//! concurrent searches — construct it once at startup and pass it by
//! reference (or `Arc`) to the session.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::MapState;

/// Lookup table from provider id to provider, preserving registration
/// order for stable fan-out.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SearchProvider>>,
    ids: HashSet<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Identity is the provider id; registering the
    /// same id twice is a configuration error.
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>) -> Result<(), SearchError> {
        let id = provider.id().to_owned();
        if !self.ids.insert(id.clone()) {
            return Err(SearchError::Config(format!(
                "provider id registered twice: {id}"
            )));
        }
        tracing::debug!(provider = %id, "provider registered");
        self.providers.push(provider);
        Ok(())
    }

    /// Look up a provider by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn SearchProvider>> {
        self.providers.iter().find(|p| p.id() == id).cloned()
    }

    /// Providers whose availability predicate holds for the current
    /// application state, in registration order.
    pub fn available(&self, map: &MapState) -> Vec<Arc<dyn SearchProvider>> {
        self.providers
            .iter()
            .filter(|p| p.is_available(map))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("ids", &self.ids)
            .finish()
    }
}

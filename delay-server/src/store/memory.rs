//! In-memory registry store for tests and throwaway runs.

use std::sync::Mutex;

use crate::domain::Registry;

use super::RegistryStore;
use super::error::StoreError;

/// Registry held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    registry: Mutex<Registry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> Registry {
        // A poisoned lock still holds the last complete save.
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let mut guard = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = registry.clone();
        Ok(())
    }
}

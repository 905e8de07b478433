//! Application state for the web layer.

use std::sync::Arc;

use crate::registry::DelayRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Delay registry service
    pub registry: Arc<DelayRegistry>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(registry: DelayRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

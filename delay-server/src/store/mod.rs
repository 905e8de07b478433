//! Registry persistence.
//!
//! The registry is always read and written as a whole. Loading never fails:
//! a missing or unreadable backing store is treated as an empty registry.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::{JsonFileStore, JsonFileStoreConfig};
pub use memory::MemoryStore;

use crate::domain::Registry;

/// A place the registry aggregate is kept between requests.
pub trait RegistryStore: Send + Sync {
    /// Read the whole registry, falling back to the empty registry.
    fn load(&self) -> Registry;

    /// Replace the stored registry.
    fn save(&self, registry: &Registry) -> Result<(), StoreError>;
}

//! JSON file backed registry store.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::Registry;

use super::RegistryStore;
use super::error::StoreError;

/// Configuration for the registry file.
#[derive(Debug, Clone)]
pub struct JsonFileStoreConfig {
    /// Path to the registry file.
    pub path: PathBuf,
}

impl JsonFileStoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Registry kept as a pretty-printed UTF-8 JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: JsonFileStoreConfig,
}

impl JsonFileStore {
    pub fn new(config: JsonFileStoreConfig) -> Self {
        Self { config }
    }

    /// Get the registry file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Sibling path the registry is written to before being renamed into place.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .config
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "registry".into());
        name.push(".tmp");
        self.config.path.with_file_name(name)
    }

    fn io_error(&self, action: &'static str, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            action,
            path: path.display().to_string(),
            source,
        }
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Registry {
        let path = self.path();

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no registry file yet");
                return Registry::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "registry file unreadable, starting empty");
                return Registry::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "registry file corrupt, starting empty");
                Registry::default()
            }
        }
    }

    fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let path = self.path();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| self.io_error("failed to create directory for", path, e))?;
        }

        // serde_json writes non-ASCII text as-is, so labels stay readable.
        let json = serde_json::to_string_pretty(registry)?;

        let temp = self.temp_path();
        std::fs::write(&temp, json).map_err(|e| self.io_error("failed to write", &temp, e))?;
        std::fs::rename(&temp, path).map_err(|e| self.io_error("failed to replace", path, e))?;

        debug!(path = %path.display(), trains = registry.len(), "saved registry");
        Ok(())
    }
}

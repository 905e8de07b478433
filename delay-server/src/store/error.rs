//! Registry storage error types.

/// Errors that can occur when persisting the registry.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Registry could not be serialized
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Blocking storage task panicked or was cancelled
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

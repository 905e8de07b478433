//! Registry operation errors.

use crate::domain::DomainError;
use crate::store::StoreError;

/// Errors returned by registry operations.
///
/// Every variant is reported back to the caller; none of them leaves the
/// stored registry partially modified.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The train has no timetable entry
    #[error("no scheduled departure found for {0}")]
    ScheduleNotFound(String),

    /// Delay outside the accepted range
    #[error(transparent)]
    InvalidDelay(#[from] DomainError),

    /// Row index does not exist
    #[error("index {index} out of range for {len} reports")]
    IndexOutOfRange { index: usize, len: usize },

    /// Registry could not be persisted
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RegistryError {
    /// Stable machine-readable name for the error.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::ScheduleNotFound(_) => "schedule_not_found",
            RegistryError::InvalidDelay(_) => "invalid_delay",
            RegistryError::IndexOutOfRange { .. } => "index_out_of_range",
            RegistryError::Storage(_) => "storage",
        }
    }
}

//! Delay registry business logic.
//!
//! Each operation loads the registry from its store, applies one change,
//! and writes the whole registry back before returning.

mod elapsed;
mod error;
mod service;

pub use elapsed::minutes_since;
pub use error::RegistryError;
pub use service::{Clock, DelayRegistry, ListedReport, ReportListing, SubmitReport};

use std::fmt;
use std::str::FromStr;

/// Departure time recorded when the timetable has no entry and the
/// permissive policy is in use.
pub const PLACEHOLDER_DEPARTURE: &str = "--:--";

/// What to do when a submitted train is missing from the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimetablePolicy {
    /// Reject the report with `ScheduleNotFound`.
    #[default]
    Strict,
    /// Store the report with [`PLACEHOLDER_DEPARTURE`].
    Permissive,
}

impl FromStr for TimetablePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TimetablePolicy::Strict),
            "permissive" => Ok(TimetablePolicy::Permissive),
            other => Err(format!("unknown timetable policy: {other}")),
        }
    }
}

impl fmt::Display for TimetablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetablePolicy::Strict => f.write_str("strict"),
            TimetablePolicy::Permissive => f.write_str("permissive"),
        }
    }
}

/// Settings for a registry instance.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Station every report is recorded against.
    pub station: String,

    /// Handling of trains absent from the timetable.
    pub policy: TimetablePolicy,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            station: "名古屋".to_string(),
            policy: TimetablePolicy::Strict,
        }
    }
}

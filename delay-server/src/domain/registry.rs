//! The persisted registry aggregate.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::report::DelayReport;

/// Ordered list of current delay reports plus the time of the last change.
///
/// Order is meaningful: it is the display order, and users can adjust it.
/// `last_updated` is a local timestamp without offset, written in ISO-8601.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub trains: Vec<DelayReport>,

    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

impl Registry {
    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }
}

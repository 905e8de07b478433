//! Static timetable lookup.
//!
//! Maps a train name (service type label + number) to its scheduled
//! departure from the tracked station. The timetable is reference data:
//! it is read once at startup and never written by this service.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

/// Train name → scheduled departure ("HH:MM") lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    entries: HashMap<String, String>,
}

impl Timetable {
    /// Build a timetable from existing entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load the timetable from a JSON object file.
    ///
    /// A missing file, or one that is not a flat string → string object,
    /// yields an empty timetable. The problem is logged, never returned.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no timetable file, using empty timetable");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "timetable not readable, using empty timetable");
                return Self::default();
            }
        };

        match Self::parse(&contents) {
            Some(timetable) => {
                info!(path = %path.display(), entries = timetable.len(), "loaded timetable");
                timetable
            }
            None => {
                warn!(path = %path.display(), "timetable is not valid JSON, using empty timetable");
                Self::default()
            }
        }
    }

    /// Parse timetable JSON, returning `None` if it is not the expected shape.
    pub fn parse(contents: &str) -> Option<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(contents).ok()?;
        Some(Self { entries })
    }

    /// Scheduled departure for a train, if the timetable knows it.
    pub fn departure_for(&self, train_name: &str) -> Option<&str> {
        self.entries.get(train_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! The registry service.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime, SubsecRound};
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::{DelayMinutes, DelayReport, DepartureStatus, Registry, Section, ServiceType};
use crate::store::{RegistryStore, StoreError};
use crate::timetable::Timetable;

use super::elapsed::minutes_since;
use super::error::RegistryError;
use super::{PLACEHOLDER_DEPARTURE, RegistrySettings, TimetablePolicy};

/// Source of the current local time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Fractional second digits kept in `last_updated`.
const TIMESTAMP_SUBSEC_DIGITS: u16 = 6;

/// A new delay report as entered by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub service_type: ServiceType,
    pub number: String,
    pub section: Section,
    pub delay_minutes: i64,
}

/// A report together with its position and derived departure status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedReport {
    pub index: usize,
    pub report: DelayReport,
    pub status: DepartureStatus,
}

/// Snapshot of the registry prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportListing {
    pub rows: Vec<ListedReport>,
    pub last_updated: Option<NaiveDateTime>,
    pub minutes_since_update: Option<i64>,
}

impl ReportListing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Row movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Delay registry backed by a [`RegistryStore`].
///
/// Store reads and writes run on the blocking thread pool. Mutations hold
/// an async write lock across their whole load-modify-save cycle, so two
/// requests in this process cannot interleave. Separate processes sharing
/// one store can still race.
pub struct DelayRegistry {
    store: Arc<dyn RegistryStore>,
    timetable: Timetable,
    settings: RegistrySettings,
    clock: Clock,
    write_lock: Mutex<()>,
}

impl DelayRegistry {
    /// Create a registry using the local wall clock.
    pub fn new(
        store: impl RegistryStore + 'static,
        timetable: Timetable,
        settings: RegistrySettings,
    ) -> Self {
        Self {
            store: Arc::new(store),
            timetable,
            settings,
            clock: Arc::new(|| Local::now().naive_local()),
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the clock (for tests).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn station(&self) -> &str {
        &self.settings.station
    }

    pub fn policy(&self) -> TimetablePolicy {
        self.settings.policy
    }

    /// Current time, truncated to microseconds so other ISO-8601 readers
    /// accept the stored timestamp.
    fn now(&self) -> NaiveDateTime {
        (self.clock)().trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS)
    }

    async fn load(&self) -> Result<Registry, RegistryError> {
        let store = Arc::clone(&self.store);
        let registry = tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(StoreError::from)?;
        Ok(registry)
    }

    /// Persist `registry`, handing it back once written.
    async fn save(&self, registry: Registry) -> Result<Registry, RegistryError> {
        let store = Arc::clone(&self.store);
        let saved = tokio::task::spawn_blocking(move || store.save(&registry).map(|()| registry))
            .await
            .map_err(StoreError::from)??;
        Ok(saved)
    }

    /// Scheduled departure the form should show for a train, if known.
    pub fn scheduled_departure(&self, service_type: ServiceType, number: &str) -> Option<&str> {
        self.timetable
            .departure_for(&service_type.train_name(number.trim()))
    }

    /// Validate a new report and append it to the end of the registry.
    pub async fn submit_report(&self, request: SubmitReport) -> Result<DelayReport, RegistryError> {
        let train_name = request.service_type.train_name(request.number.trim());

        let departure_time = match self.timetable.departure_for(&train_name) {
            Some(time) => time.to_string(),
            None => match self.settings.policy {
                TimetablePolicy::Strict => {
                    return Err(RegistryError::ScheduleNotFound(train_name));
                }
                TimetablePolicy::Permissive => PLACEHOLDER_DEPARTURE.to_string(),
            },
        };

        let delay_minutes = DelayMinutes::new(request.delay_minutes)?;

        let report = DelayReport {
            train_name,
            section: request.section.label().to_string(),
            departure_time,
            delay_minutes,
            station: self.settings.station.clone(),
        };

        let _guard = self.write_lock.lock().await;
        let mut registry = self.load().await?;
        registry.trains.push(report.clone());
        registry.last_updated = Some(self.now());
        let registry = self.save(registry).await?;

        info!(
            train = %report.train_name,
            section = %report.section,
            delay = report.delay_minutes.get(),
            total = registry.len(),
            "registered delay report"
        );
        Ok(report)
    }

    /// Current reports in display order, with derived departure status.
    pub async fn list_reports(&self) -> Result<ReportListing, RegistryError> {
        let registry = self.load().await?;
        Ok(self.listing(registry))
    }

    fn listing(&self, registry: Registry) -> ReportListing {
        let rows = registry
            .trains
            .into_iter()
            .enumerate()
            .map(|(index, report)| ListedReport {
                index,
                status: report.status(),
                report,
            })
            .collect();

        ReportListing {
            rows,
            last_updated: registry.last_updated,
            minutes_since_update: minutes_since(registry.last_updated, self.now()),
        }
    }

    /// Swap the report at `index` with the one above it.
    ///
    /// Moving the first row up is a no-op.
    pub async fn move_up(&self, index: usize) -> Result<(), RegistryError> {
        self.shift(index, Direction::Up).await
    }

    /// Swap the report at `index` with the one below it.
    ///
    /// Moving the last row down is a no-op.
    pub async fn move_down(&self, index: usize) -> Result<(), RegistryError> {
        self.shift(index, Direction::Down).await
    }

    async fn shift(&self, index: usize, direction: Direction) -> Result<(), RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut registry = self.load().await?;
        let len = registry.len();
        if index >= len {
            return Err(RegistryError::IndexOutOfRange { index, len });
        }

        let other = match direction {
            Direction::Up if index == 0 => return Ok(()),
            Direction::Up => index - 1,
            Direction::Down if index == len - 1 => return Ok(()),
            Direction::Down => index + 1,
        };

        // Reordering leaves last_updated alone.
        registry.trains.swap(index, other);
        self.save(registry).await?;

        info!(from = index, to = other, ?direction, "moved delay report");
        Ok(())
    }

    /// Remove the report at `index`.
    pub async fn delete_report(&self, index: usize) -> Result<DelayReport, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut registry = self.load().await?;
        let len = registry.len();
        if index >= len {
            return Err(RegistryError::IndexOutOfRange { index, len });
        }

        let removed = registry.trains.remove(index);
        registry.last_updated = Some(self.now());
        let registry = self.save(registry).await?;

        info!(train = %removed.train_name, index, remaining = registry.len(), "deleted delay report");
        Ok(removed)
    }
}

impl fmt::Debug for DelayRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayRegistry")
            .field("timetable_entries", &self.timetable.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

//! Delay reports and their derived departure status.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::time::ClockTime;

/// A reported delay in whole minutes, always within `0..=120`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct DelayMinutes(u16);

impl DelayMinutes {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 120;

    /// Validate a raw minute count.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(DomainError::InvalidDelay {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(&self) -> u16 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for DelayMinutes {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DelayMinutes> for u16 {
    fn from(delay: DelayMinutes) -> Self {
        delay.0
    }
}

/// One user-submitted delay report.
///
/// `departure_time` is copied from the timetable when the report is created
/// and never changes afterwards. It is kept as the raw string so that a
/// malformed value in storage only affects its own row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayReport {
    pub train_name: String,
    pub section: String,
    pub departure_time: String,
    pub delay_minutes: DelayMinutes,
    pub station: String,
}

impl DelayReport {
    /// Work out the effective departure for display.
    pub fn status(&self) -> DepartureStatus {
        let scheduled = match ClockTime::parse_hhmm(&self.departure_time) {
            Ok(t) => t,
            Err(e) => {
                return DepartureStatus::MalformedTime {
                    raw: self.departure_time.clone(),
                    reason: e.reason(),
                };
            }
        };

        if self.delay_minutes.is_zero() {
            DepartureStatus::OnTime { scheduled }
        } else {
            let minutes = self.delay_minutes.get();
            DepartureStatus::Delayed {
                scheduled,
                expected: scheduled.add_minutes(u32::from(minutes)),
                minutes,
            }
        }
    }
}

/// Derived departure state of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartureStatus {
    /// No delay reported.
    OnTime { scheduled: ClockTime },

    /// Departure pushed back by `minutes`.
    Delayed {
        scheduled: ClockTime,
        expected: ClockTime,
        minutes: u16,
    },

    /// The stored departure time could not be read.
    MalformedTime { raw: String, reason: &'static str },
}

impl DepartureStatus {
    pub fn is_delayed(&self) -> bool {
        matches!(self, DepartureStatus::Delayed { .. })
    }
}

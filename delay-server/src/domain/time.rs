//! Time-of-day handling for timetable entries.
//!
//! The timetable and the registry store departures as "HH:MM" strings with
//! no date attached. Effective departures are computed with ordinary clock
//! arithmetic, so a delay can carry a departure past midnight.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Short description of what was wrong with the input.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A validated 24-hour time of day with minute precision.
///
/// # Examples
///
/// ```
/// use delay_server::domain::ClockTime;
///
/// let time = ClockTime::parse_hhmm("14:30").unwrap();
/// assert_eq!(time.to_string(), "14:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build a time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use delay_server::domain::ClockTime;
    ///
    /// // Valid times
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    ///
    /// // Invalid formats
    /// assert!(ClockTime::parse_hhmm("1430").is_err());
    /// assert!(ClockTime::parse_hhmm("14:3").is_err());
    /// assert!(ClockTime::parse_hhmm("25:00").is_err());
    /// assert!(ClockTime::parse_hhmm("--:--").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 5 bytes: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Self::from_hm(hour, minute).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Add whole minutes, wrapping around midnight.
    ///
    /// # Examples
    ///
    /// ```
    /// use delay_server::domain::ClockTime;
    ///
    /// let time = ClockTime::parse_hhmm("23:50").unwrap();
    /// assert_eq!(time.add_minutes(20).to_string(), "00:10");
    /// ```
    pub fn add_minutes(&self, minutes: u32) -> Self {
        let (wrapped, _) = self
            .0
            .overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        Self(wrapped)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_time() -> impl Strategy<Value = ClockTime> {
        (0u32..24, 0u32..60).prop_map(|(h, m)| ClockTime::from_hm(h, m).unwrap())
    }

    proptest! {
        /// Adding minutes agrees with modular arithmetic on a 24h clock.
        #[test]
        fn add_minutes_is_modular(t in arb_time(), delay in 0u32..=120) {
            let expected = (t.minutes_from_midnight() + delay) % 1440;
            prop_assert_eq!(t.add_minutes(delay).minutes_from_midnight(), expected);
        }

        /// Display output always parses back to the same time.
        #[test]
        fn display_parses_back(t in arb_time()) {
            prop_assert_eq!(ClockTime::parse_hhmm(&t.to_string()).unwrap(), t);
        }
    }
}

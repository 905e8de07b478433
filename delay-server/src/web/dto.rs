//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{DelayReport, DepartureStatus, Section, ServiceType};
use crate::registry::{ListedReport, ReportListing, SubmitReport};

/// Request to register a new delay report.
///
/// Used for both the JSON API and the HTML form.
#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    /// Service type (`nozomi`, `hikari`, `kodama`)
    pub service_type: ServiceType,

    /// Train number, e.g. "99"
    #[serde(default)]
    pub number: String,

    /// Section the train is currently running on
    pub section: Section,

    /// Reported delay in minutes (0-120)
    pub delay_minutes: i64,
}

impl From<SubmitReportRequest> for SubmitReport {
    fn from(req: SubmitReportRequest) -> Self {
        SubmitReport {
            service_type: req.service_type,
            number: req.number,
            section: req.section,
            delay_minutes: req.delay_minutes,
        }
    }
}

/// HTML form submission.
///
/// The delay arrives as text so that a blank or non-numeric field can be
/// reported on the form instead of rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub service_type: ServiceType,
    #[serde(default)]
    pub number: String,
    pub section: Section,
    #[serde(default)]
    pub delay_minutes: String,
}

/// Query for the submission page; fills the form and previews the schedule.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitPageQuery {
    pub service_type: Option<ServiceType>,
    pub number: Option<String>,
    pub section: Option<Section>,
    pub delay_minutes: Option<String>,
}

/// Query for a scheduled departure lookup.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub service_type: Option<ServiceType>,
    pub number: Option<String>,
}

/// Response for a scheduled departure lookup.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    /// Train name that was looked up
    pub train_name: String,

    /// Scheduled departure, if the timetable has one
    pub departure_time: Option<String>,
}

/// A report in list responses.
#[derive(Debug, Serialize)]
pub struct ReportResult {
    /// Position in the registry (used by move and delete)
    pub index: usize,

    pub train_name: String,
    pub section: String,
    pub station: String,

    /// Scheduled departure as stored
    pub departure_time: String,

    pub delay_minutes: u16,

    /// `on_time`, `delayed` or `malformed_time`
    pub status: &'static str,

    /// Departure after applying the delay (delayed rows only)
    pub expected_departure: Option<String>,

    /// Why the stored time could not be read (malformed rows only)
    pub time_error: Option<String>,
}

impl ReportResult {
    /// Create from a listed report.
    pub fn from_listed(row: &ListedReport) -> Self {
        let (status, expected_departure, time_error) = match &row.status {
            DepartureStatus::OnTime { .. } => ("on_time", None, None),
            DepartureStatus::Delayed { expected, .. } => {
                ("delayed", Some(expected.to_string()), None)
            }
            DepartureStatus::MalformedTime { reason, .. } => {
                ("malformed_time", None, Some(reason.to_string()))
            }
        };

        Self {
            index: row.index,
            train_name: row.report.train_name.clone(),
            section: row.report.section.clone(),
            station: row.report.station.clone(),
            departure_time: row.report.departure_time.clone(),
            delay_minutes: row.report.delay_minutes.get(),
            status,
            expected_departure,
            time_error,
        }
    }
}

/// Response listing all current reports.
#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ReportResult>,

    /// ISO-8601 local timestamp of the last append or delete
    pub last_updated: Option<NaiveDateTime>,

    /// Whole minutes since `last_updated`
    pub minutes_since_update: Option<i64>,
}

impl ReportListResponse {
    pub fn from_listing(listing: &ReportListing) -> Self {
        Self {
            reports: listing.rows.iter().map(ReportResult::from_listed).collect(),
            last_updated: listing.last_updated,
            minutes_since_update: listing.minutes_since_update,
        }
    }
}

/// Response for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitReportResponse {
    /// The report as stored
    pub report: DelayReport,

    /// Registry contents after the submission
    #[serde(flatten)]
    pub listing: ReportListResponse,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub kind: String,

    /// Human-readable message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DelayMinutes;

    fn listed(departure_time: &str, delay: i64) -> ListedReport {
        let report = DelayReport {
            train_name: "こだま701".into(),
            section: "岐阜羽島→名古屋".into(),
            departure_time: departure_time.into(),
            delay_minutes: DelayMinutes::new(delay).unwrap(),
            station: "名古屋".into(),
        };
        ListedReport {
            index: 4,
            status: report.status(),
            report,
        }
    }

    #[test]
    fn delayed_row_has_expected_departure() {
        let result = ReportResult::from_listed(&listed("23:50", 20));
        assert_eq!(result.index, 4);
        assert_eq!(result.status, "delayed");
        assert_eq!(result.expected_departure.as_deref(), Some("00:10"));
        assert!(result.time_error.is_none());
    }

    #[test]
    fn on_time_row() {
        let result = ReportResult::from_listed(&listed("09:00", 0));
        assert_eq!(result.status, "on_time");
        assert!(result.expected_departure.is_none());
    }

    #[test]
    fn malformed_row_reports_reason() {
        let result = ReportResult::from_listed(&listed("--:--", 3));
        assert_eq!(result.status, "malformed_time");
        assert_eq!(result.time_error.as_deref(), Some("invalid hour digits"));
    }

    #[test]
    fn submit_request_from_json() {
        let req: SubmitReportRequest = serde_json::from_str(
            r#"{"service_type":"nozomi","number":"99","section":"kyoto_gifu_hashima","delay_minutes":15}"#,
        )
        .unwrap();
        let submit = SubmitReport::from(req);
        assert_eq!(submit.service_type, ServiceType::Nozomi);
        assert_eq!(submit.section, Section::KyotoGifuHashima);
        assert_eq!(submit.delay_minutes, 15);
    }

    #[test]
    fn listing_response_shape() {
        let listing = ReportListing {
            rows: vec![listed("10:00", 0)],
            last_updated: None,
            minutes_since_update: None,
        };
        let json = serde_json::to_value(ReportListResponse::from_listing(&listing)).unwrap();
        assert_eq!(json["reports"][0]["status"], "on_time");
        assert_eq!(json["last_updated"], serde_json::Value::Null);
    }
}

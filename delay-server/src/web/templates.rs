//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{DepartureStatus, Section, ServiceType};
use crate::registry::{ListedReport, ReportListing};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Report list tab.
#[derive(Template)]
#[template(path = "reports.html")]
pub struct ReportsTemplate {
    pub station: String,
    pub active_tab: &'static str,
    pub reports: Vec<ReportView>,
    pub minutes_since_update: Option<i64>,
}

impl ReportsTemplate {
    pub fn new(station: &str, listing: &ReportListing) -> Self {
        Self {
            station: station.to_string(),
            active_tab: "reports",
            reports: ReportView::from_listing(listing),
            minutes_since_update: listing.minutes_since_update,
        }
    }
}

/// Report submission tab.
#[derive(Template)]
#[template(path = "submit.html")]
pub struct SubmitTemplate {
    pub station: String,
    pub active_tab: &'static str,
    pub service_types: Vec<OptionView>,
    pub sections: Vec<OptionView>,
    pub number: String,
    pub delay_minutes: i64,
    pub scheduled_departure: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl SubmitTemplate {
    /// Form with the given selections and the scheduled departure they map to.
    pub fn new(
        station: &str,
        service_type: ServiceType,
        number: &str,
        section: Section,
        delay_minutes: i64,
        scheduled_departure: Option<&str>,
    ) -> Self {
        let service_types = ServiceType::ALL
            .iter()
            .map(|t| OptionView {
                value: t.as_str(),
                label: t.label(),
                selected: *t == service_type,
            })
            .collect();
        let sections = Section::ALL
            .iter()
            .map(|s| OptionView {
                value: s.as_str(),
                label: s.label(),
                selected: *s == section,
            })
            .collect();

        Self {
            station: station.to_string(),
            active_tab: "submit",
            service_types,
            sections,
            number: number.to_string(),
            delay_minutes,
            scheduled_departure: scheduled_departure
                .unwrap_or(crate::registry::PLACEHOLDER_DEPARTURE)
                .to_string(),
            notice: None,
            error: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Reorder/delete tab.
#[derive(Template)]
#[template(path = "manage.html")]
pub struct ManageTemplate {
    pub station: String,
    pub active_tab: &'static str,
    pub reports: Vec<ReportView>,
}

impl ManageTemplate {
    pub fn new(station: &str, listing: &ReportListing) -> Self {
        Self {
            station: station.to_string(),
            active_tab: "manage",
            reports: ReportView::from_listing(listing),
        }
    }
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub station: String,
    pub active_tab: &'static str,
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Report row view model.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub index: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub train_name: String,
    pub section: String,
    pub station: String,
    pub departure_time: String,
    pub delay_minutes: u16,
    pub expected_departure: Option<String>,
    pub time_error: Option<String>,
}

impl ReportView {
    /// Whether the row should be highlighted as delayed.
    pub fn is_delayed(&self) -> bool {
        self.expected_departure.is_some()
    }

    /// Whether the stored departure time could not be read.
    pub fn is_malformed(&self) -> bool {
        self.time_error.is_some()
    }

    /// Text for the effective departure column.
    pub fn display_departure(&self) -> String {
        match (&self.expected_departure, &self.time_error) {
            (Some(expected), _) => format!("{}（{}分遅れ）", expected, self.delay_minutes),
            (None, Some(_)) => "時刻不明".to_string(),
            (None, None) => "定刻".to_string(),
        }
    }

    fn from_listed(row: &ListedReport, len: usize) -> Self {
        let (expected_departure, time_error) = match &row.status {
            DepartureStatus::OnTime { .. } => (None, None),
            DepartureStatus::Delayed { expected, .. } => (Some(expected.to_string()), None),
            DepartureStatus::MalformedTime { raw, reason } => {
                (None, Some(format!("{raw}: {reason}")))
            }
        };

        Self {
            index: row.index,
            is_first: row.index == 0,
            is_last: row.index + 1 == len,
            train_name: row.report.train_name.clone(),
            section: row.report.section.clone(),
            station: row.report.station.clone(),
            departure_time: row.report.departure_time.clone(),
            delay_minutes: row.report.delay_minutes.get(),
            expected_departure,
            time_error,
        }
    }

    pub fn from_listing(listing: &ReportListing) -> Vec<Self> {
        let len = listing.rows.len();
        listing
            .rows
            .iter()
            .map(|row| Self::from_listed(row, len))
            .collect()
    }
}

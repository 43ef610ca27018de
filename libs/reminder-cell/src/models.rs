// libs/reminder-cell/src/models.rs
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use shared_models::{CellValue, TabGrid};
use workbook_cell::ErrorLogEntry;

use crate::services::schema::TabSchema;

// ==============================================================================
// SCHEDULE MODELS
// ==============================================================================

/// One patient row of a provider tab.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRow {
    /// 1-based sheet row; the only handle for writing back a send confirmation.
    pub position: usize,
    pub patient_name: String,
    pub appointment_type: String,
    pub raw_time: CellValue,
    pub phone: String,
    /// Existing `Link Sent` text, possibly several space separated stamps.
    pub link_sent: String,
    pub follow_up: Option<String>,
    pub dob_marker: Option<String>,
}

impl AppointmentRow {
    /// Type codes starting with `T` (T, TF, TE, ...) are telehealth visits.
    pub fn is_telehealth(&self) -> bool {
        self.appointment_type.trim().to_uppercase().starts_with('T')
    }

    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }

    /// A DOB of `*` marks an intake that has not been completed.
    pub fn intake_incomplete(&self) -> bool {
        self.dob_marker
            .as_deref()
            .map(|dob| dob.trim() == "*")
            .unwrap_or(false)
    }
}

/// One provider's daily schedule tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTab {
    pub name: String,
    pub schema: TabSchema,
    pub rows: Vec<AppointmentRow>,
    /// `Appt With` value of the first data row, when the column exists.
    pub provider_display_name: Option<String>,
}

impl ProviderTab {
    pub fn with_schema(grid: &TabGrid, schema: TabSchema) -> Self {
        let rows = grid
            .data_rows()
            .map(|(position, cells)| schema.row(position, cells))
            .collect();

        let provider_display_name = grid
            .data_rows()
            .next()
            .and_then(|(_, cells)| schema.appt_with(cells));

        Self {
            name: grid.name.clone(),
            schema,
            rows,
            provider_display_name,
        }
    }

    pub fn telehealth_rows(&self) -> Vec<&AppointmentRow> {
        self.rows.iter().filter(|row| row.is_telehealth()).collect()
    }
}

/// The instant a provider's shift is considered open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub earliest_appointment: NaiveDateTime,
    pub lead: Duration,
}

impl ShiftWindow {
    pub fn new(earliest_appointment: NaiveDateTime, lead_minutes: i64) -> Self {
        Self {
            earliest_appointment,
            lead: Duration::minutes(lead_minutes),
        }
    }

    pub fn opens_at(&self) -> NaiveDateTime {
        self.earliest_appointment - self.lead
    }

    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        now >= self.opens_at()
    }
}

// ==============================================================================
// EVALUATION RESULTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoPhone,
    IncompleteIntake,
    AlreadySeen { note: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabStatus {
    /// Shift open (or no time parsed); eligible rows are sent.
    Ready,
    NoData,
    MissingColumns { missing: Vec<&'static str> },
    NoTelehealthRows,
    ShiftNotStarted { opens_at: NaiveDateTime },
    /// The tab could not be read.
    Unread,
}

/// What a tab would do at a given instant, before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct TabPlan {
    pub tab: String,
    pub status: TabStatus,
    pub schema: Option<TabSchema>,
    pub provider_token: String,
    pub shift: Option<ShiftWindow>,
    pub eligible: Vec<AppointmentRow>,
    pub skipped: Vec<(usize, SkipReason)>,
}

impl TabPlan {
    pub fn empty(tab: &str, status: TabStatus) -> Self {
        Self {
            tab: tab.to_string(),
            status,
            schema: None,
            provider_token: String::new(),
            shift: None,
            eligible: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Details carried to the error log when a send fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendFailure {
    pub provider_tab: String,
    pub patient_name: String,
    pub appointment_time: String,
    pub phone: String,
    pub error: String,
}

impl SendFailure {
    pub fn to_log_entry(&self, timestamp: NaiveDateTime) -> ErrorLogEntry {
        ErrorLogEntry {
            timestamp,
            provider_tab: self.provider_tab.clone(),
            patient_name: self.patient_name.clone(),
            appointment_time: self.appointment_time.clone(),
            phone_number: self.phone.clone(),
            error_message: self.error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub row: usize,
    pub success: bool,
    /// New `Link Sent` value written back on success.
    pub link_sent: Option<String>,
    pub failure: Option<SendFailure>,
}

impl SendOutcome {
    pub fn sent(row: usize, link_sent: String) -> Self {
        Self {
            row,
            success: true,
            link_sent: Some(link_sent),
            failure: None,
        }
    }

    pub fn failed(row: usize, failure: SendFailure) -> Self {
        Self {
            row,
            success: false,
            link_sent: None,
            failure: Some(failure),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabReport {
    pub tab: String,
    pub status: TabStatus,
    pub sent_count: usize,
    pub outcomes: Vec<SendOutcome>,
}

impl TabReport {
    pub fn new(tab: &str, status: TabStatus) -> Self {
        Self {
            tab: tab.to_string(),
            status,
            sent_count: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| !outcome.success).count()
    }
}

/// Counts reported at the end of a run; not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub workbook: Option<String>,
    pub tabs_processed: usize,
    pub messages_sent: usize,
    pub send_failures: usize,
    /// Tab whose name matched a stop marker, if iteration halted early.
    pub stopped_at: Option<String>,
}

// libs/reminder-cell/src/lib.rs
//! # Reminder Cell
//!
//! Decides which telehealth patients on today's schedule get a video-call
//! link by text message, and when.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------------+
//! |                     Reminder Cell                         |
//! +-----------------------------------------------------------+
//! |  models.rs            |  Rows, tabs, shift window, reports |
//! |  error.rs             |  ReminderError                     |
//! |  services/                                                |
//! |    time_parser.rs     |  Appointment time cells -> today   |
//! |    name_extractor.rs  |  Provider token for meeting links  |
//! |    follow_up.rs       |  Ordered "already seen" rules      |
//! |    schema.rs          |  Header-driven column resolution   |
//! |    eligibility.rs     |  Per-tab gate, skips and sends     |
//! |    run.rs             |  Whole-workbook pass               |
//! +-----------------------------------------------------------+
//! ```
//!
//! ## Run semantics
//!
//! A run walks the provider tabs of today's workbook in order and halts at the
//! first tab whose name contains a configured stop marker. For each tab the
//! provider's shift opens `time_window_minutes` before the earliest telehealth
//! appointment; before then the tab is left alone. Once open, every telehealth
//! row with a phone number, a completed intake and no "already seen" follow-up
//! note is sent the provider's meeting link, and the send time is appended to
//! the row's `Link Sent` cell.
//!
//! The `Link Sent` marker is a record, not a gate: a later run inside the same
//! shift sends again unless the follow-up note says otherwise.

pub mod error;
pub mod models;
pub mod services;

pub use error::{ReminderError, TabFault};
pub use models::{
    AppointmentRow, ProviderTab, RunSummary, SendFailure, SendOutcome, ShiftWindow, SkipReason,
    TabPlan, TabReport, TabStatus,
};
pub use services::{
    append_link_sent, EligibilityEvaluator, FollowUpClassifier, NameExtractor, ReminderSettings,
    RunController, TabContext, TabSchema, TimeParser,
};

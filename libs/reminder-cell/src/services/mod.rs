// libs/reminder-cell/src/services/mod.rs

pub mod eligibility;
pub mod follow_up;
pub mod name_extractor;
pub mod run;
pub mod schema;
pub mod time_parser;

pub use eligibility::{append_link_sent, EligibilityEvaluator, ReminderSettings, TabContext};
pub use follow_up::FollowUpClassifier;
pub use name_extractor::NameExtractor;
pub use run::RunController;
pub use schema::TabSchema;
pub use time_parser::TimeParser;

use tracing::error;

use workbook_cell::{ErrorLogEntry, ErrorLogSink};

/// Appends to the error log; a failing sink is reported and otherwise ignored.
pub(crate) async fn record_error(sink: &dyn ErrorLogSink, entry: &ErrorLogEntry) {
    if let Err(err) = sink.append(entry).await {
        error!("Failed to log error: {}", err);
    }
}

use thiserror::Error;

use shared_models::AppError;
use workbook_cell::WorkbookError;

use crate::models::TabReport;

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
}

impl From<ReminderError> for AppError {
    fn from(err: ReminderError) -> Self {
        match err {
            ReminderError::Workbook(inner) => inner.into(),
        }
    }
}

/// A fault that ended a tab early, with the report of what it did before.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct TabFault {
    pub report: TabReport,
    pub error: ReminderError,
}

impl TabFault {
    pub fn new(report: TabReport, error: impl Into<ReminderError>) -> Self {
        Self {
            report,
            error: error.into(),
        }
    }
}

impl From<TabFault> for AppError {
    fn from(fault: TabFault) -> Self {
        fault.error.into()
    }
}

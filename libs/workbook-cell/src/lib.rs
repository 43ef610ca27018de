//! # Workbook Cell
//!
//! Spreadsheet collaborators for the reminder run:
//!
//! - **Workbook lookup**: finds the day's appointment workbook in Google Drive
//!   by its `MM-dd-yyyy appointment` file name, rejecting Excel uploads.
//! - **Tab access**: reads a whole tab as a grid and writes single cells
//!   through the Sheets v4 API.
//! - **Error log**: append-only `Messaging Errors` tab, created with a bold
//!   header row on first use.
//!
//! In-memory implementations of every trait live in `services::memory` for
//! tests and dry runs.

pub mod error;
pub mod models;
pub mod services;
pub mod traits;

pub use error::WorkbookError;
pub use models::{DriveFile, ErrorLogEntry, ERROR_LOG_HEADERS};
pub use services::{
    DriveWorkbookSource, InMemoryErrorLog, InMemoryWorkbook, InMemoryWorkbookSource,
    SheetsErrorLog, SheetsWorkbook,
};
pub use traits::{ErrorLogSink, Workbook, WorkbookSource};

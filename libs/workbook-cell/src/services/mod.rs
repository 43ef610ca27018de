// libs/workbook-cell/src/services/mod.rs

pub mod drive;
pub mod error_log;
pub mod memory;
pub mod range;
pub mod sheets;

pub use drive::DriveWorkbookSource;
pub use error_log::SheetsErrorLog;
pub use memory::{InMemoryErrorLog, InMemoryWorkbook, InMemoryWorkbookSource};
pub use sheets::SheetsWorkbook;

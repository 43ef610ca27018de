use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use shared_models::TabGrid;

use crate::error::WorkbookError;
use crate::models::ErrorLogEntry;

/// One day's appointment workbook: an ordered set of provider tabs.
#[async_trait]
pub trait Workbook: Send + Sync {
    fn name(&self) -> &str;

    /// Hours this workbook's clock cells run ahead of the time staff see.
    /// `None` defers to the configured offset.
    fn clock_offset_hours(&self) -> Option<i64> {
        None
    }

    /// Tab names in their stored order.
    async fn tab_names(&self) -> Result<Vec<String>, WorkbookError>;

    /// Whole tab as a grid; row 0 is the header row.
    async fn read_tab(&self, tab: &str) -> Result<TabGrid, WorkbookError>;

    /// Writes one cell at a 1-based (row, column) coordinate.
    async fn write_cell(
        &self,
        tab: &str,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), WorkbookError>;
}

impl std::fmt::Debug for dyn Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook").field("name", &self.name()).finish_non_exhaustive()
    }
}

#[async_trait]
pub trait WorkbookSource: Send + Sync {
    /// `Ok(None)` when no workbook exists for the date.
    async fn find_todays_workbook(
        &self,
        date: NaiveDate,
    ) -> Result<Option<Arc<dyn Workbook>>, WorkbookError>;
}

#[async_trait]
pub trait ErrorLogSink: Send + Sync {
    async fn append(&self, entry: &ErrorLogEntry) -> Result<(), WorkbookError>;
}

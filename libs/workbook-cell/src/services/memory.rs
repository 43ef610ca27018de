// libs/workbook-cell/src/services/memory.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use shared_models::{CellValue, TabGrid};

use crate::error::WorkbookError;
use crate::models::ErrorLogEntry;
use crate::traits::{ErrorLogSink, Workbook, WorkbookSource};

/// Workbook held entirely in memory, for tests and dry runs.
pub struct InMemoryWorkbook {
    name: String,
    tabs: RwLock<Vec<TabGrid>>,
}

impl InMemoryWorkbook {
    pub fn new(name: impl Into<String>, tabs: Vec<TabGrid>) -> Self {
        Self {
            name: name.into(),
            tabs: RwLock::new(tabs),
        }
    }

    pub async fn tab(&self, name: &str) -> Option<TabGrid> {
        self.tabs
            .read()
            .await
            .iter()
            .find(|tab| tab.name == name)
            .cloned()
    }

    pub async fn cell(&self, tab: &str, row: usize, column: usize) -> Option<CellValue> {
        self.tab(tab).await.map(|grid| grid.cell(row, column))
    }
}

#[async_trait]
impl Workbook for InMemoryWorkbook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn tab_names(&self) -> Result<Vec<String>, WorkbookError> {
        Ok(self.tabs.read().await.iter().map(|tab| tab.name.clone()).collect())
    }

    async fn read_tab(&self, tab: &str) -> Result<TabGrid, WorkbookError> {
        self.tab(tab)
            .await
            .ok_or_else(|| WorkbookError::TabNotFound(tab.to_string()))
    }

    async fn write_cell(
        &self,
        tab: &str,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), WorkbookError> {
        if row == 0 || column == 0 {
            return Err(WorkbookError::InvalidCoordinate { row, column });
        }

        let mut tabs = self.tabs.write().await;
        let grid = tabs
            .iter_mut()
            .find(|grid| grid.name == tab)
            .ok_or_else(|| WorkbookError::TabNotFound(tab.to_string()))?;

        grid.set_cell(row, column, CellValue::from(value));
        Ok(())
    }
}

/// Source that returns a fixed workbook regardless of date.
#[derive(Default)]
pub struct InMemoryWorkbookSource {
    workbook: Option<Arc<InMemoryWorkbook>>,
    unsupported_file: Option<String>,
}

impl InMemoryWorkbookSource {
    pub fn new(workbook: Arc<InMemoryWorkbook>) -> Self {
        Self {
            workbook: Some(workbook),
            unsupported_file: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Source whose only match is a non-native upload.
    pub fn unsupported(file_name: impl Into<String>) -> Self {
        Self {
            workbook: None,
            unsupported_file: Some(file_name.into()),
        }
    }
}

#[async_trait]
impl WorkbookSource for InMemoryWorkbookSource {
    async fn find_todays_workbook(
        &self,
        _date: NaiveDate,
    ) -> Result<Option<Arc<dyn Workbook>>, WorkbookError> {
        if let Some(file_name) = &self.unsupported_file {
            return Err(WorkbookError::UnsupportedFormat {
                file_name: file_name.clone(),
            });
        }

        Ok(self
            .workbook
            .as_ref()
            .map(|workbook| Arc::clone(workbook) as Arc<dyn Workbook>))
    }
}

#[derive(Default)]
pub struct InMemoryErrorLog {
    entries: RwLock<Vec<ErrorLogEntry>>,
}

impl InMemoryErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<ErrorLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl ErrorLogSink for InMemoryErrorLog {
    async fn append(&self, entry: &ErrorLogEntry) -> Result<(), WorkbookError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}

use thiserror::Error;

use shared_models::AppError;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Workbook integration not configured")]
    NotConfigured,

    #[error(
        "Cannot process '{file_name}' directly: open the file, choose File > Save as Google Sheets, then run again"
    )]
    UnsupportedFormat { file_name: String },

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Invalid cell coordinate: row {row}, column {column}")]
    InvalidCoordinate { row: usize, column: usize },

    #[error("Google API error: {0}")]
    Api(String),
}

impl From<anyhow::Error> for WorkbookError {
    fn from(err: anyhow::Error) -> Self {
        WorkbookError::Api(err.to_string())
    }
}

impl From<WorkbookError> for AppError {
    fn from(err: WorkbookError) -> Self {
        match err {
            WorkbookError::NotConfigured => AppError::Config(err.to_string()),
            WorkbookError::TabNotFound(_) => AppError::NotFound(err.to_string()),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}

// libs/workbook-cell/src/services/drive.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, error, info, instrument};
use urlencoding::encode;

use shared_config::AppConfig;
use shared_google::GoogleApiClient;
use shared_utils::workbook_date_tokens;

use crate::error::WorkbookError;
use crate::models::{DriveFile, DriveFileList, GOOGLE_SHEETS_MIME_TYPE};
use crate::services::sheets::SheetsWorkbook;
use crate::traits::{Workbook, WorkbookSource};

const FILE_FIELDS: &str = "files(id,name,mimeType)";

/// Finds the day's appointment workbook by file name in Google Drive.
pub struct DriveWorkbookSource {
    google: Arc<GoogleApiClient>,
    drive_base_url: String,
    sheets_base_url: String,
    name_suffix: String,
}

impl std::fmt::Debug for DriveWorkbookSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveWorkbookSource")
            .field("drive_base_url", &self.drive_base_url)
            .field("sheets_base_url", &self.sheets_base_url)
            .field("name_suffix", &self.name_suffix)
            .finish_non_exhaustive()
    }
}

impl DriveWorkbookSource {
    pub fn new(config: &AppConfig, google: Arc<GoogleApiClient>) -> Result<Self, WorkbookError> {
        if !config.is_workbook_configured() {
            return Err(WorkbookError::NotConfigured);
        }

        Ok(Self {
            google,
            drive_base_url: config.google_drive_base_url.clone(),
            sheets_base_url: config.google_sheets_base_url.clone(),
            name_suffix: config.workbook_name_suffix.clone(),
        })
    }

    /// File-name fragment searched for, e.g. `11-12-2025 appointment`.
    fn name_fragment(&self, date_token: &str) -> String {
        let fragment = format!("{} {}", date_token, self.name_suffix);
        fragment.trim().replace('\'', "\\'")
    }

    async fn search(&self, query: &str) -> Result<Vec<DriveFile>, WorkbookError> {
        debug!("Searching Drive with query: {}", query);

        let url = format!(
            "{}/files?q={}&fields={}&orderBy={}",
            self.drive_base_url,
            encode(query),
            encode(FILE_FIELDS),
            encode("modifiedTime desc")
        );
        let list: DriveFileList = self.google.request(Method::GET, &url, None).await?;
        Ok(list.files)
    }

    fn open(&self, file: &DriveFile) -> Arc<dyn Workbook> {
        info!("Found sheet: {}", file.name);
        Arc::new(SheetsWorkbook::new(
            Arc::clone(&self.google),
            self.sheets_base_url.clone(),
            file.id.clone(),
            file.name.clone(),
        ))
    }
}

#[async_trait]
impl WorkbookSource for DriveWorkbookSource {
    #[instrument(skip(self))]
    async fn find_todays_workbook(
        &self,
        date: NaiveDate,
    ) -> Result<Option<Arc<dyn Workbook>>, WorkbookError> {
        let tokens = workbook_date_tokens(date);
        info!("Looking for sheets with date: {}", tokens.join(" or "));

        // Native spreadsheets first.
        for token in &tokens {
            let query = format!(
                "mimeType = '{}' and name contains '{}' and trashed = false",
                GOOGLE_SHEETS_MIME_TYPE,
                self.name_fragment(token)
            );
            let files = self.search(&query).await?;

            if let Some(file) = files.first() {
                return Ok(Some(self.open(file)));
            }
        }

        for token in &tokens {
            let query = format!(
                "name contains '{}' and trashed = false",
                self.name_fragment(token)
            );

            for file in self.search(&query).await? {
                if file.is_excel() {
                    error!("Found Excel file {}: cannot process it directly", file.name);
                    error!("1. Open the file: {}", file.name);
                    error!("2. Go to File > Save as Google Sheets");
                    error!("3. Run this job again");
                    return Err(WorkbookError::UnsupportedFormat {
                        file_name: file.name,
                    });
                }

                if file.is_native_spreadsheet() {
                    return Ok(Some(self.open(&file)));
                }
            }
        }

        info!("No matching files found.");
        Ok(None)
    }
}

// libs/workbook-cell/src/services/error_log.rs
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};
use urlencoding::encode;

use shared_config::AppConfig;
use shared_google::GoogleApiClient;

use crate::error::WorkbookError;
use crate::models::{BatchUpdateResponse, ErrorLogEntry, Spreadsheet, ERROR_LOG_HEADERS};
use crate::services::range::a1_columns;
use crate::traits::ErrorLogSink;

/// Append-only error log kept as a tab of the configured spreadsheet.
pub struct SheetsErrorLog {
    google: Arc<GoogleApiClient>,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    sheet_ready: Mutex<bool>,
}

impl SheetsErrorLog {
    pub fn new(config: &AppConfig, google: Arc<GoogleApiClient>) -> Result<Self, WorkbookError> {
        if !config.is_workbook_configured() || config.spreadsheet_id.is_empty() {
            return Err(WorkbookError::NotConfigured);
        }

        Ok(Self {
            google,
            base_url: config.google_sheets_base_url.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.error_log_sheet.clone(),
            sheet_ready: Mutex::new(false),
        })
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id)
    }

    /// Creates the log tab with a bold header row the first time it is needed.
    async fn ensure_sheet(&self) -> Result<(), WorkbookError> {
        let mut ready = self.sheet_ready.lock().await;
        if *ready {
            return Ok(());
        }

        let url = format!(
            "{}?fields={}",
            self.spreadsheet_url(),
            encode("sheets.properties(sheetId,title)")
        );
        let spreadsheet: Spreadsheet = self.google.request(Method::GET, &url, None).await?;

        let exists = spreadsheet
            .sheets
            .iter()
            .any(|sheet| sheet.properties.title == self.sheet_name);

        if !exists {
            info!("Creating error log sheet '{}'", self.sheet_name);

            let response: BatchUpdateResponse = self
                .batch_update(json!([{
                    "addSheet": { "properties": { "title": self.sheet_name } }
                }]))
                .await?;

            let sheet_id = response
                .replies
                .into_iter()
                .find_map(|reply| reply.add_sheet)
                .map(|reply| reply.properties.sheet_id)
                .ok_or_else(|| {
                    WorkbookError::Api("addSheet reply missing sheet properties".to_string())
                })?;

            let headers = ERROR_LOG_HEADERS.iter().map(|h| h.to_string()).collect();
            self.append_row(headers).await?;

            let _: BatchUpdateResponse = self
                .batch_update(json!([{
                    "repeatCell": {
                        "range": {
                            "sheetId": sheet_id,
                            "startRowIndex": 0,
                            "endRowIndex": 1,
                            "startColumnIndex": 0,
                            "endColumnIndex": ERROR_LOG_HEADERS.len(),
                        },
                        "cell": { "userEnteredFormat": { "textFormat": { "bold": true } } },
                        "fields": "userEnteredFormat.textFormat.bold",
                    }
                }]))
                .await?;
        }

        *ready = true;
        Ok(())
    }

    async fn batch_update(&self, requests: Value) -> Result<BatchUpdateResponse, WorkbookError> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        let response = self
            .google
            .request(Method::POST, &url, Some(json!({ "requests": requests })))
            .await?;
        Ok(response)
    }

    async fn append_row(&self, row: Vec<String>) -> Result<(), WorkbookError> {
        let range = a1_columns(&self.sheet_name, ERROR_LOG_HEADERS.len());
        let url = format!(
            "{}/values/{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.spreadsheet_url(),
            encode(&range)
        );

        let _: Value = self
            .google
            .request(Method::POST, &url, Some(json!({ "values": [row] })))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ErrorLogSink for SheetsErrorLog {
    async fn append(&self, entry: &ErrorLogEntry) -> Result<(), WorkbookError> {
        self.ensure_sheet().await?;

        debug!(
            "Logging error for tab {}: {}",
            entry.provider_tab, entry.error_message
        );
        self.append_row(entry.to_row()).await
    }
}

// libs/workbook-cell/src/services/sheets.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveTime;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use urlencoding::encode;

use shared_google::GoogleApiClient;
use shared_models::{CellValue, TabGrid};

use crate::error::WorkbookError;
use crate::models::{CellData, Spreadsheet};
use crate::services::range::{a1_cell, quote_tab};
use crate::traits::Workbook;

const TAB_LIST_FIELDS: &str = "sheets.properties(sheetId,title)";
const GRID_FIELDS: &str =
    "sheets(properties(sheetId,title),data(rowData(values(effectiveValue,effectiveFormat.numberFormat,formattedValue))))";

/// A native Google Sheets workbook accessed through the Sheets v4 API.
pub struct SheetsWorkbook {
    google: Arc<GoogleApiClient>,
    base_url: String,
    spreadsheet_id: String,
    title: String,
}

impl SheetsWorkbook {
    pub fn new(
        google: Arc<GoogleApiClient>,
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            google,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            title: title.into(),
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id)
    }
}

#[async_trait]
impl Workbook for SheetsWorkbook {
    fn name(&self) -> &str {
        &self.title
    }

    /// `cell_value` decodes serials to the displayed time, so no correction applies.
    fn clock_offset_hours(&self) -> Option<i64> {
        Some(0)
    }

    async fn tab_names(&self) -> Result<Vec<String>, WorkbookError> {
        let url = format!("{}?fields={}", self.spreadsheet_url(), encode(TAB_LIST_FIELDS));
        let spreadsheet: Spreadsheet = self.google.request(Method::GET, &url, None).await?;

        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    async fn read_tab(&self, tab: &str) -> Result<TabGrid, WorkbookError> {
        debug!("Reading tab '{}' from {}", tab, self.title);

        let url = format!(
            "{}?includeGridData=true&ranges={}&fields={}",
            self.spreadsheet_url(),
            encode(&quote_tab(tab)),
            encode(GRID_FIELDS)
        );
        let spreadsheet: Spreadsheet = self.google.request(Method::GET, &url, None).await?;

        let sheet = spreadsheet
            .sheets
            .into_iter()
            .next()
            .ok_or_else(|| WorkbookError::TabNotFound(tab.to_string()))?;

        let rows = sheet
            .data
            .iter()
            .flat_map(|grid| grid.row_data.iter())
            .map(|row| row.values.iter().map(cell_value).collect())
            .collect();

        Ok(TabGrid::new(tab, rows))
    }

    async fn write_cell(
        &self,
        tab: &str,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), WorkbookError> {
        let range = a1_cell(tab, row, column)?;
        let url = format!(
            "{}/values/{}?valueInputOption=RAW",
            self.spreadsheet_url(),
            encode(&range)
        );

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[value]],
        });

        let _: Value = self.google.request(Method::PUT, &url, Some(body)).await?;

        info!("Updated {} in {}", range, self.title);
        Ok(())
    }
}

/// Maps an API cell to a `CellValue`. Time-formatted numbers become clock
/// values; date-formatted numbers keep the text the sheet displays.
pub fn cell_value(cell: &CellData) -> CellValue {
    let Some(value) = &cell.effective_value else {
        return CellValue::Empty;
    };

    if let Some(number) = value.number_value {
        let format_type = cell
            .effective_format
            .as_ref()
            .and_then(|format| format.number_format.as_ref())
            .map(|format| format.format_type.as_str())
            .unwrap_or_default();

        match format_type {
            "TIME" | "DATE_TIME" => {
                if let Some(time) = serial_to_clock(number) {
                    return CellValue::Clock(time);
                }
            }
            "DATE" => {
                if let Some(text) = &cell.formatted_value {
                    return CellValue::from(text.as_str());
                }
            }
            _ => {}
        }
        return CellValue::Number(number);
    }

    if let Some(text) = &value.string_value {
        return CellValue::from(text.as_str());
    }

    match value.bool_value {
        Some(flag) => CellValue::Bool(flag),
        None => CellValue::Empty,
    }
}

/// Time-of-day part of a spreadsheet serial number (fraction of a day).
fn serial_to_clock(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = (serial.fract().abs() * 86_400.0).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellFormat, ExtendedValue, NumberFormat};

    fn number_cell(number: f64, format_type: Option<&str>) -> CellData {
        number_cell_showing(number, format_type, None)
    }

    fn number_cell_showing(number: f64, format_type: Option<&str>, shown: Option<&str>) -> CellData {
        CellData {
            effective_value: Some(ExtendedValue {
                number_value: Some(number),
                ..Default::default()
            }),
            effective_format: format_type.map(|kind| CellFormat {
                number_format: Some(NumberFormat {
                    format_type: kind.to_string(),
                }),
            }),
            formatted_value: shown.map(str::to_string),
        }
    }

    #[test]
    fn test_time_formatted_number_becomes_clock() {
        let value = cell_value(&number_cell(0.5, Some("TIME")));
        assert_eq!(value, CellValue::Clock(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));

        let value = cell_value(&number_cell(45973.375, Some("DATE_TIME")));
        assert_eq!(value, CellValue::Clock(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
    }

    #[test]
    fn test_date_formatted_number_keeps_display_text() {
        let value = cell_value(&number_cell_showing(45731.0, Some("DATE"), Some("3/15/2025")));
        assert_eq!(value, CellValue::from("3/15/2025"));

        let value = cell_value(&number_cell_showing(45731.0, Some("DATE"), None));
        assert_eq!(value, CellValue::Number(45731.0));
    }

    #[test]
    fn test_sheets_workbook_reads_displayed_clock() {
        let google = Arc::new(GoogleApiClient::with_token("token".to_string()));
        let workbook = SheetsWorkbook::new(google, "http://localhost", "sheet-1", "today");
        assert_eq!(workbook.clock_offset_hours(), Some(0));
    }

    #[test]
    fn test_plain_number_stays_number() {
        let value = cell_value(&number_cell(5551234567.0, None));
        assert_eq!(value, CellValue::Number(5551234567.0));
    }

    #[test]
    fn test_missing_value_is_empty() {
        assert_eq!(cell_value(&CellData::default()), CellValue::Empty);
    }
}

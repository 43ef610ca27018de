// libs/workbook-cell/src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use shared_utils::format_log_timestamp;

pub const GOOGLE_SHEETS_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

pub const ERROR_LOG_HEADERS: [&str; 6] = [
    "Timestamp",
    "Provider Tab",
    "Patient Name",
    "Appointment Time",
    "Phone Number",
    "Error Message",
];

// ==============================================================================
// DRIVE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
}

impl DriveFile {
    pub fn is_native_spreadsheet(&self) -> bool {
        self.mime_type == GOOGLE_SHEETS_MIME_TYPE
    }

    pub fn is_excel(&self) -> bool {
        let name = self.name.to_lowercase();
        name.ends_with(".xlsx") || name.ends_with(".xls")
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

// ==============================================================================
// SHEETS MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Sheet {
    #[serde(default)]
    pub properties: SheetProperties,
    #[serde(default)]
    pub data: Vec<GridData>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default)]
    pub row_data: Vec<RowData>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub effective_value: Option<ExtendedValue>,
    pub effective_format: Option<CellFormat>,
    pub formatted_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedValue {
    pub number_value: Option<f64>,
    pub string_value: Option<String>,
    pub bool_value: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub number_format: Option<NumberFormat>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NumberFormat {
    #[serde(rename = "type", default)]
    pub format_type: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<BatchUpdateReply>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateReply {
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AddSheetReply {
    #[serde(default)]
    pub properties: SheetProperties,
}

// ==============================================================================
// ERROR LOG
// ==============================================================================

/// One row of the messaging error log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    pub timestamp: NaiveDateTime,
    pub provider_tab: String,
    pub patient_name: String,
    pub appointment_time: String,
    pub phone_number: String,
    pub error_message: String,
}

impl ErrorLogEntry {
    /// Entry for a fault that is not tied to a patient row.
    pub fn for_scope(timestamp: NaiveDateTime, scope: &str, error_message: String) -> Self {
        Self {
            timestamp,
            provider_tab: scope.to_string(),
            patient_name: "N/A".to_string(),
            appointment_time: "N/A".to_string(),
            phone_number: "N/A".to_string(),
            error_message,
        }
    }

    pub fn system(timestamp: NaiveDateTime, error_message: String) -> Self {
        Self::for_scope(timestamp, "System", error_message)
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_log_timestamp(self.timestamp),
            self.provider_tab.clone(),
            self.patient_name.clone(),
            self.appointment_time.clone(),
            self.phone_number.clone(),
            self.error_message.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_system_entry_row() {
        let timestamp = NaiveDate::from_ymd_opt(2025, 11, 12)
            .unwrap()
            .and_hms_opt(8, 5, 9)
            .unwrap();
        let entry = ErrorLogEntry::system(timestamp, "boom".to_string());

        assert_eq!(
            entry.to_row(),
            vec!["11/12/2025 08:05:09", "System", "N/A", "N/A", "N/A", "boom"]
        );
    }

    #[test]
    fn test_drive_file_format_checks() {
        let upload = DriveFile {
            id: "1".to_string(),
            name: "11-12-2025 appointment.XLSX".to_string(),
            mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
        };
        assert!(upload.is_excel());
        assert!(!upload.is_native_spreadsheet());

        let native = DriveFile {
            id: "2".to_string(),
            name: "11-12-2025 appointment".to_string(),
            mime_type: GOOGLE_SHEETS_MIME_TYPE.to_string(),
        };
        assert!(!native.is_excel());
        assert!(native.is_native_spreadsheet());
    }
}

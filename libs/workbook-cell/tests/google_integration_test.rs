use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param, query_param_contains};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_google::GoogleApiClient;
use shared_models::CellValue;
use shared_utils::test_utils::TestConfig;
use workbook_cell::{
    DriveWorkbookSource, ErrorLogEntry, ErrorLogSink, SheetsErrorLog, SheetsWorkbook, Workbook,
    WorkbookError, WorkbookSource,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 12).unwrap()
}

fn google() -> Arc<GoogleApiClient> {
    Arc::new(GoogleApiClient::with_token("test-access-token".to_string()))
}

#[tokio::test]
async fn test_lookup_prefers_native_spreadsheet() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param_contains("q", "mimeType = 'application/vnd.google-apps.spreadsheet'"))
        .and(query_param_contains("q", "11-12-2025 appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{
                "id": "sheet-1",
                "name": "11-12-2025 appointments",
                "mimeType": "application/vnd.google-apps.spreadsheet"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = DriveWorkbookSource::new(&config, google()).unwrap();
    let workbook = source.find_todays_workbook(today()).await.unwrap();

    assert_eq!(workbook.unwrap().name(), "11-12-2025 appointments");
}

#[tokio::test]
async fn test_lookup_rejects_excel_upload() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param_contains("q", "mimeType"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": [] })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{
                "id": "upload-1",
                "name": "11-12-2025 appointment.xlsx",
                "mimeType": "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }]
        })))
        .mount(&mock_server)
        .await;

    let source = DriveWorkbookSource::new(&config, google()).unwrap();
    let result = source.find_todays_workbook(today()).await;

    assert_matches!(
        result,
        Err(WorkbookError::UnsupportedFormat { file_name }) if file_name == "11-12-2025 appointment.xlsx"
    );
}

#[tokio::test]
async fn test_lookup_without_match_returns_none() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": [] })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let source = DriveWorkbookSource::new(&config, google()).unwrap();
    assert!(source.find_todays_workbook(today()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_lookup_requires_configuration() {
    let mut config = TestConfig::default().to_app_config();
    config.google_access_token = String::new();

    assert_matches!(
        DriveWorkbookSource::new(&config, google()),
        Err(WorkbookError::NotConfigured)
    );
}

#[tokio::test]
async fn test_read_tab_maps_cells() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spreadsheets/sheet-1"))
        .and(query_param("includeGridData", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [{
                "properties": { "sheetId": 7, "title": "Lee" },
                "data": [{
                    "rowData": [
                        { "values": [
                            { "effectiveValue": { "stringValue": "Name" } },
                            { "effectiveValue": { "stringValue": "Time" } },
                            { "effectiveValue": { "stringValue": "Phone #" } }
                        ]},
                        { "values": [
                            { "effectiveValue": { "stringValue": "Ann" } },
                            {
                                "effectiveValue": { "numberValue": 0.5 },
                                "effectiveFormat": { "numberFormat": { "type": "TIME" } }
                            },
                            { "effectiveValue": { "numberValue": 5551234567.0 } }
                        ]},
                        {}
                    ]
                }]
            }]
        })))
        .mount(&mock_server)
        .await;

    let workbook = SheetsWorkbook::new(google(), mock_server.uri(), "sheet-1", "today");
    let grid = workbook.read_tab("Lee").await.unwrap();

    assert_eq!(grid.name, "Lee");
    assert_eq!(grid.rows.len(), 3);
    assert_eq!(grid.cell(1, 3), CellValue::from("Phone #"));
    assert_eq!(
        grid.cell(2, 2),
        CellValue::Clock(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    );
    assert_eq!(grid.cell(2, 3).to_string(), "5551234567");
    assert!(grid.rows[2].is_empty());
}

#[tokio::test]
async fn test_tab_names_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spreadsheets/sheet-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [
                { "properties": { "sheetId": 1, "title": "Lee" } },
                { "properties": { "sheetId": 2, "title": "Patel" } }
            ]
        })))
        .mount(&mock_server)
        .await;

    let workbook = SheetsWorkbook::new(google(), mock_server.uri(), "sheet-1", "today");
    assert_eq!(workbook.tab_names().await.unwrap(), vec!["Lee", "Patel"]);
}

#[tokio::test]
async fn test_write_cell_puts_single_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/spreadsheets/sheet-1/values/.+"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_partial_json(json!({ "range": "'Lee'!D2", "values": [["8:20 9:16 AM"]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updatedCells": 1 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let workbook = SheetsWorkbook::new(google(), mock_server.uri(), "sheet-1", "today");
    workbook.write_cell("Lee", 2, 4, "8:20 9:16 AM").await.unwrap();
}

#[tokio::test]
async fn test_error_log_creates_sheet_once() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/spreadsheets/error-log-sheet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sheets": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/spreadsheets/error-log-sheet:batchUpdate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "replies": [{ "addSheet": { "properties": { "sheetId": 42, "title": "Messaging Errors" } } }]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/spreadsheets/error-log-sheet/values/.+:append$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updates": {} })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let log = SheetsErrorLog::new(&config, google()).unwrap();
    let timestamp = today().and_hms_opt(9, 16, 0).unwrap();

    log.append(&ErrorLogEntry::system(timestamp, "first".to_string()))
        .await
        .unwrap();
    log.append(&ErrorLogEntry::system(timestamp, "second".to_string()))
        .await
        .unwrap();
}

use chrono_tz::Tz;

use shared_config::AppConfig;

pub struct TestConfig {
    pub google_base_url: String,
    pub clicksend_api_url: String,
    pub stop_at_tabs: Vec<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            google_base_url: "http://localhost:9090".to_string(),
            clicksend_api_url: "http://localhost:9091/v3/sms/send".to_string(),
            stop_at_tabs: Vec::new(),
        }
    }
}

impl TestConfig {
    /// Points every Google and ClickSend endpoint at a single mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            google_base_url: uri.to_string(),
            clicksend_api_url: format!("{}/v3/sms/send", uri),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            spreadsheet_id: "error-log-sheet".to_string(),
            google_access_token: "test-access-token".to_string(),
            google_drive_base_url: self.google_base_url.clone(),
            google_sheets_base_url: self.google_base_url.clone(),
            clicksend_username: "test-user".to_string(),
            clicksend_api_key: "test-api-key".to_string(),
            clicksend_api_url: self.clicksend_api_url.clone(),
            sms_from: "GSMG".to_string(),
            sms_source: "telehealth-sender".to_string(),
            meeting_host: "goldstandard.doxy.me".to_string(),
            time_window_minutes: 5,
            clock_offset_hours: 3,
            stop_at_tabs: self.stop_at_tabs.clone(),
            error_log_sheet: "Messaging Errors".to_string(),
            workbook_name_suffix: "appointment".to_string(),
            clinic_timezone: Tz::UTC,
        }
    }
}

use std::env;

use chrono_tz::Tz;
use tracing::warn;

pub const DEFAULT_CLICKSEND_API_URL: &str = "https://rest.clicksend.com/v3/sms/send";
pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_MEETING_HOST: &str = "goldstandard.doxy.me";
pub const DEFAULT_ERROR_LOG_SHEET: &str = "Messaging Errors";
pub const DEFAULT_TIME_WINDOW_MINUTES: i64 = 5;
pub const DEFAULT_CLOCK_OFFSET_HOURS: i64 = 3;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Spreadsheet that hosts the error-log tab.
    pub spreadsheet_id: String,
    pub google_access_token: String,
    pub google_drive_base_url: String,
    pub google_sheets_base_url: String,
    pub clicksend_username: String,
    pub clicksend_api_key: String,
    pub clicksend_api_url: String,
    pub sms_from: String,
    pub sms_source: String,
    pub meeting_host: String,
    /// Lead time before the earliest telehealth appointment at which a shift opens.
    pub time_window_minutes: i64,
    /// Hours the source spreadsheet's clock cells run ahead of the displayed time.
    pub clock_offset_hours: i64,
    /// Tab-name markers past which no provider tabs are processed.
    pub stop_at_tabs: Vec<String>,
    pub error_log_sheet: String,
    pub workbook_name_suffix: String,
    pub clinic_timezone: Tz,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            spreadsheet_id: env::var("SPREADSHEET_ID")
                .unwrap_or_else(|_| {
                    warn!("SPREADSHEET_ID not set, using empty value");
                    String::new()
                }),
            google_access_token: env::var("GOOGLE_ACCESS_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("GOOGLE_ACCESS_TOKEN not set, using empty value");
                    String::new()
                }),
            google_drive_base_url: env::var("GOOGLE_DRIVE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DRIVE_BASE_URL.to_string()),
            google_sheets_base_url: env::var("GOOGLE_SHEETS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SHEETS_BASE_URL.to_string()),
            clicksend_username: env::var("CLICKSEND_USERNAME")
                .unwrap_or_else(|_| {
                    warn!("CLICKSEND_USERNAME not set, using empty value");
                    String::new()
                }),
            clicksend_api_key: env::var("CLICKSEND_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLICKSEND_API_KEY not set, using empty value");
                    String::new()
                }),
            clicksend_api_url: env::var("CLICKSEND_API_URL")
                .unwrap_or_else(|_| DEFAULT_CLICKSEND_API_URL.to_string()),
            sms_from: env::var("SMS_FROM").unwrap_or_else(|_| "GSMG".to_string()),
            sms_source: env::var("SMS_SOURCE").unwrap_or_else(|_| "telehealth-sender".to_string()),
            meeting_host: env::var("MEETING_HOST")
                .unwrap_or_else(|_| DEFAULT_MEETING_HOST.to_string()),
            time_window_minutes: parse_number_var("TIME_WINDOW_MINUTES", DEFAULT_TIME_WINDOW_MINUTES),
            clock_offset_hours: parse_number_var("CLOCK_OFFSET_HOURS", DEFAULT_CLOCK_OFFSET_HOURS),
            stop_at_tabs: env::var("STOP_AT_TABS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            error_log_sheet: env::var("ERROR_LOG_SHEET")
                .unwrap_or_else(|_| DEFAULT_ERROR_LOG_SHEET.to_string()),
            workbook_name_suffix: env::var("WORKBOOK_NAME_SUFFIX")
                .unwrap_or_else(|_| "appointment".to_string()),
            clinic_timezone: parse_timezone(env::var("CLINIC_TIMEZONE").ok().as_deref()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.is_sms_configured() && self.is_workbook_configured()
    }

    pub fn is_sms_configured(&self) -> bool {
        !self.clicksend_username.is_empty()
            && !self.clicksend_api_key.is_empty()
            && !self.clicksend_api_url.is_empty()
    }

    pub fn is_workbook_configured(&self) -> bool {
        !self.google_access_token.is_empty()
            && !self.google_drive_base_url.is_empty()
            && !self.google_sheets_base_url.is_empty()
    }
}

fn parse_number_var(key: &str, default: i64) -> i64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Splits a comma separated list, dropping blank entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_timezone(raw: Option<&str>) -> Tz {
    match raw.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.parse().unwrap_or_else(|_| {
            warn!("CLINIC_TIMEZONE '{}' is not a valid IANA zone, using UTC", name);
            Tz::UTC
        }),
        None => {
            warn!("CLINIC_TIMEZONE not set, using UTC");
            Tz::UTC
        }
    }
}

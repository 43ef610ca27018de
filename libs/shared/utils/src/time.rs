use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Current wall-clock time in the clinic's timezone.
pub fn clinic_now(timezone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&timezone).naive_local()
}

/// `9:16 AM` style stamp written into the Link Sent column.
pub fn format_clock(time: NaiveDateTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// `11/12/2025 09:16:00` style stamp used by the error log.
pub fn format_log_timestamp(time: NaiveDateTime) -> String {
    time.format("%m/%d/%Y %H:%M:%S").to_string()
}

/// Date fragments that appear in a day's workbook file name, padded form first.
pub fn workbook_date_tokens(date: NaiveDate) -> Vec<String> {
    let padded = date.format("%m-%d-%Y").to_string();
    let unpadded = date.format("%-m-%-d-%Y").to_string();

    if padded == unpadded {
        vec![padded]
    } else {
        vec![padded, unpadded]
    }
}

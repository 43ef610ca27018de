pub mod test_utils;
pub mod time;

pub use time::{clinic_now, format_clock, format_log_timestamp, workbook_date_tokens};

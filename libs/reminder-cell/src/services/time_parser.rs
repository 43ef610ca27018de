// libs/reminder-cell/src/services/time_parser.rs
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

use shared_config::DEFAULT_CLOCK_OFFSET_HOURS;
use shared_models::CellValue;

/// `9:00`, `9:00 AM`, `14:30`, `2:30pm`; first match anywhere in the text.
const TEXT_TIME_PATTERN: &str = r"(\d{1,2}):(\d{2})(?:\s*([AaPp][Mm]))?";

/// Turns an appointment-time cell into a timestamp on the current date.
pub struct TimeParser {
    clock_offset_hours: i64,
    text_pattern: Option<Regex>,
}

impl Default for TimeParser {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_OFFSET_HOURS)
    }
}

impl TimeParser {
    /// `clock_offset_hours` is how far the sheet's clock cells run ahead of the
    /// time shown to staff.
    pub fn new(clock_offset_hours: i64) -> Self {
        Self {
            clock_offset_hours,
            text_pattern: Regex::new(TEXT_TIME_PATTERN).ok(),
        }
    }

    /// `None` for anything that does not read as a time of day.
    pub fn parse(&self, raw: &CellValue, today: NaiveDate) -> Option<NaiveDateTime> {
        self.parse_with_offset(raw, today, self.clock_offset_hours)
    }

    /// Same as `parse`, with the clock-cell offset supplied by the caller.
    pub fn parse_with_offset(
        &self,
        raw: &CellValue,
        today: NaiveDate,
        clock_offset_hours: i64,
    ) -> Option<NaiveDateTime> {
        match raw {
            CellValue::Empty => None,
            CellValue::Clock(time) => {
                let hour = (i64::from(time.hour()) - clock_offset_hours).rem_euclid(24);
                today.and_hms_opt(u32::try_from(hour).ok()?, time.minute(), 0)
            }
            other => self.parse_text(&other.to_string(), today),
        }
    }

    fn parse_text(&self, raw: &str, today: NaiveDate) -> Option<NaiveDateTime> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let captures = self.text_pattern.as_ref()?.captures(text)?;
        let mut hours: u32 = captures.get(1)?.as_str().parse().ok()?;
        let minutes: u32 = captures.get(2)?.as_str().parse().ok()?;
        let meridiem = captures.get(3).map(|m| m.as_str().to_uppercase());

        match meridiem.as_deref() {
            Some("PM") if hours != 12 => hours += 12,
            Some("AM") if hours == 12 => hours = 0,
            // The clinic books afternoons without a suffix: 1-7 means PM.
            None if (1..=7).contains(&hours) => hours += 12,
            _ => {}
        }

        today.and_hms_opt(hours, minutes, 0)
    }
}

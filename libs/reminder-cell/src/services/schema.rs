// libs/reminder-cell/src/services/schema.rs
use shared_models::CellValue;

use crate::models::AppointmentRow;

pub const APPOINTMENT_TYPE_HEADER: &str = "O/T";
pub const TIME_HEADER: &str = "Time";
pub const PHONE_HEADER: &str = "Phone #";
pub const LINK_SENT_HEADER: &str = "Link Sent";
pub const APPT_WITH_HEADER: &str = "Appt With";
pub const FOLLOW_UP_HEADER: &str = "Follow Up";
pub const DOB_HEADER: &str = "DOB";

const DEFAULT_PATIENT_NAME: &str = "Patient";

/// Column positions (0-based) resolved from a tab's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSchema {
    pub appointment_type: usize,
    /// Falls back to the first column when no `Time` header exists.
    pub time: usize,
    pub phone: usize,
    pub link_sent: usize,
    pub appt_with: Option<usize>,
    pub follow_up: Option<usize>,
    pub dob: Option<usize>,
}

impl TabSchema {
    /// Headers are trimmed and matched exactly; the first occurrence wins.
    /// On failure returns the required headers that are absent.
    pub fn resolve(headers: &[CellValue]) -> Result<Self, Vec<&'static str>> {
        let names: Vec<String> = headers.iter().map(CellValue::trimmed).collect();
        let find = |header: &str| names.iter().position(|name| name == header);

        let appointment_type = find(APPOINTMENT_TYPE_HEADER);
        let phone = find(PHONE_HEADER);
        let link_sent = find(LINK_SENT_HEADER);

        match (appointment_type, phone, link_sent) {
            (Some(appointment_type), Some(phone), Some(link_sent)) => Ok(Self {
                appointment_type,
                time: find(TIME_HEADER).unwrap_or(0),
                phone,
                link_sent,
                appt_with: find(APPT_WITH_HEADER),
                follow_up: find(FOLLOW_UP_HEADER),
                dob: find(DOB_HEADER),
            }),
            _ => Err([
                (APPOINTMENT_TYPE_HEADER, appointment_type),
                (PHONE_HEADER, phone),
                (LINK_SENT_HEADER, link_sent),
            ]
            .into_iter()
            .filter(|(_, index)| index.is_none())
            .map(|(header, _)| header)
            .collect()),
        }
    }

    /// 1-based column used when writing the send stamp back.
    pub fn link_sent_column(&self) -> usize {
        self.link_sent + 1
    }

    pub fn row(&self, position: usize, cells: &[CellValue]) -> AppointmentRow {
        let at = |index: usize| cells.get(index).cloned().unwrap_or_default();
        let optional = |index: Option<usize>| index.and_then(|index| at(index).non_blank());

        AppointmentRow {
            position,
            patient_name: at(0)
                .non_blank()
                .unwrap_or_else(|| DEFAULT_PATIENT_NAME.to_string()),
            appointment_type: at(self.appointment_type).trimmed(),
            raw_time: at(self.time),
            phone: at(self.phone).to_string(),
            link_sent: at(self.link_sent).to_string(),
            follow_up: optional(self.follow_up),
            dob_marker: optional(self.dob),
        }
    }

    pub fn appt_with(&self, cells: &[CellValue]) -> Option<String> {
        self.appt_with
            .and_then(|index| cells.get(index))
            .and_then(CellValue::non_blank)
    }
}

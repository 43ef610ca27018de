// libs/reminder-cell/src/services/eligibility.rs
use chrono::NaiveDateTime;
use tracing::{debug, info, instrument, warn};

use messaging_cell::{MeetingLinkBuilder, SmsSender};
use shared_config::{
    AppConfig, DEFAULT_CLOCK_OFFSET_HOURS, DEFAULT_MEETING_HOST, DEFAULT_TIME_WINDOW_MINUTES,
};
use shared_models::TabGrid;
use shared_utils::format_clock;
use workbook_cell::{ErrorLogSink, Workbook};

use crate::error::TabFault;
use crate::models::{
    AppointmentRow, ProviderTab, SendFailure, SendOutcome, ShiftWindow, SkipReason, TabPlan,
    TabReport, TabStatus,
};

use super::follow_up::FollowUpClassifier;
use super::name_extractor::NameExtractor;
use super::record_error;
use super::schema::TabSchema;
use super::time_parser::TimeParser;

/// Rows echoed at debug level so operators can see how times were read.
const SAMPLE_ROWS: usize = 5;

#[derive(Debug, Clone)]
pub struct ReminderSettings {
    pub lead_minutes: i64,
    pub clock_offset_hours: i64,
    pub meeting_host: String,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            lead_minutes: DEFAULT_TIME_WINDOW_MINUTES,
            clock_offset_hours: DEFAULT_CLOCK_OFFSET_HOURS,
            meeting_host: DEFAULT_MEETING_HOST.to_string(),
        }
    }
}

impl ReminderSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            lead_minutes: config.time_window_minutes,
            clock_offset_hours: config.clock_offset_hours,
            meeting_host: config.meeting_host.clone(),
        }
    }
}

/// Collaborators a tab evaluation talks to.
#[derive(Clone, Copy)]
pub struct TabContext<'a> {
    pub workbook: &'a dyn Workbook,
    pub sender: &'a dyn SmsSender,
    pub error_log: &'a dyn ErrorLogSink,
}

pub struct EligibilityEvaluator {
    settings: ReminderSettings,
    time_parser: TimeParser,
    name_extractor: NameExtractor,
    follow_up: FollowUpClassifier,
    links: MeetingLinkBuilder,
}

impl Default for EligibilityEvaluator {
    fn default() -> Self {
        Self::new(ReminderSettings::default())
    }
}

impl EligibilityEvaluator {
    pub fn new(settings: ReminderSettings) -> Self {
        Self {
            time_parser: TimeParser::new(settings.clock_offset_hours),
            name_extractor: NameExtractor::new(),
            follow_up: FollowUpClassifier::new(),
            links: MeetingLinkBuilder::new(settings.meeting_host.clone()),
            settings,
        }
    }

    /// Shift window from the earliest parseable telehealth time, if any.
    /// `clock_offset_hours` applies to clock cells only.
    pub fn shift_window(
        &self,
        rows: &[&AppointmentRow],
        now: NaiveDateTime,
        clock_offset_hours: i64,
    ) -> Option<ShiftWindow> {
        let today = now.date();
        let mut parsed = 0;
        let mut earliest: Option<NaiveDateTime> = None;

        for row in rows {
            match self
                .time_parser
                .parse_with_offset(&row.raw_time, today, clock_offset_hours)
            {
                Some(time) => {
                    parsed += 1;
                    debug!("Parsed appointment time: {} -> {}", row.raw_time, format_clock(time));
                    earliest = Some(earliest.map_or(time, |current| current.min(time)));
                }
                None => debug!("Failed to parse time: {:?}", row.raw_time.to_string()),
            }
        }

        debug!("Valid appointments with times found: {}", parsed);
        earliest.map(|time| ShiftWindow::new(time, self.settings.lead_minutes))
    }

    /// Why a telehealth row must not be messaged, checked in order.
    pub fn skip_reason(&self, row: &AppointmentRow) -> Option<SkipReason> {
        if !row.has_phone() {
            return Some(SkipReason::NoPhone);
        }
        if row.intake_incomplete() {
            return Some(SkipReason::IncompleteIntake);
        }
        if self.follow_up.has_been_seen(row.follow_up.as_deref()) {
            return Some(SkipReason::AlreadySeen {
                note: row.follow_up.clone().unwrap_or_default(),
            });
        }
        None
    }

    /// Decides what a tab would do at `now` without touching any collaborator.
    pub fn plan(&self, grid: &TabGrid, now: NaiveDateTime) -> TabPlan {
        self.plan_with_offset(grid, now, self.settings.clock_offset_hours)
    }

    /// `plan` for a workbook whose clock cells carry their own offset.
    pub fn plan_with_offset(
        &self,
        grid: &TabGrid,
        now: NaiveDateTime,
        clock_offset_hours: i64,
    ) -> TabPlan {
        if grid.rows.len() < 2 {
            info!("Tab {} has no data rows", grid.name);
            return TabPlan::empty(&grid.name, TabStatus::NoData);
        }

        let headers = grid.header().unwrap_or(&[]);
        let schema = match TabSchema::resolve(headers) {
            Ok(schema) => schema,
            Err(missing) => {
                warn!(
                    "Missing required columns in tab {}: {}",
                    grid.name,
                    missing.join(", ")
                );
                return TabPlan::empty(&grid.name, TabStatus::MissingColumns { missing });
            }
        };

        let tab = ProviderTab::with_schema(grid, schema);
        for row in tab.rows.iter().take(SAMPLE_ROWS) {
            debug!(
                "Row {}: Time={}, O/T={}",
                row.position, row.raw_time, row.appointment_type
            );
        }

        let telehealth = tab.telehealth_rows();
        if telehealth.is_empty() {
            info!("No telehealth appointments found in tab {}", tab.name);
            return TabPlan {
                schema: Some(schema),
                ..TabPlan::empty(&tab.name, TabStatus::NoTelehealthRows)
            };
        }
        info!("Telehealth rows found in tab {}: {}", tab.name, telehealth.len());

        let shift = self.shift_window(&telehealth, now, clock_offset_hours);
        match shift {
            Some(window) if !window.is_open(now) => {
                info!(
                    "Provider shift has not started (opens {}, now {}); skipping tab {}",
                    format_clock(window.opens_at()),
                    format_clock(now),
                    tab.name
                );
                return TabPlan {
                    schema: Some(schema),
                    shift,
                    ..TabPlan::empty(
                        &tab.name,
                        TabStatus::ShiftNotStarted {
                            opens_at: window.opens_at(),
                        },
                    )
                };
            }
            Some(window) => info!(
                "Provider shift started at {}; proceeding",
                format_clock(window.opens_at())
            ),
            None => warn!(
                "Could not parse any appointment time in tab {}; proceeding anyway",
                tab.name
            ),
        }

        let provider_token = self
            .name_extractor
            .extract_first_name(&tab.name, tab.provider_display_name.as_deref());

        let mut eligible = Vec::new();
        let mut skipped = Vec::new();
        for row in telehealth {
            match self.skip_reason(row) {
                Some(reason) => {
                    info!("Skipping row {}: {:?}", row.position, reason);
                    skipped.push((row.position, reason));
                }
                None => eligible.push(row.clone()),
            }
        }

        TabPlan {
            tab: tab.name.clone(),
            status: TabStatus::Ready,
            schema: Some(schema),
            provider_token,
            shift,
            eligible,
            skipped,
        }
    }

    /// Reads one tab, sends to every eligible row and stamps `Link Sent` for
    /// each accepted message. Send failures are logged and do not stop the tab.
    /// A workbook fault ends the tab; the fault carries what was sent so far.
    #[instrument(skip(self, ctx, now))]
    pub async fn evaluate(
        &self,
        ctx: &TabContext<'_>,
        tab: &str,
        now: NaiveDateTime,
    ) -> Result<TabReport, TabFault> {
        let grid = ctx
            .workbook
            .read_tab(tab)
            .await
            .map_err(|err| TabFault::new(TabReport::new(tab, TabStatus::Unread), err))?;

        let clock_offset_hours = ctx
            .workbook
            .clock_offset_hours()
            .unwrap_or(self.settings.clock_offset_hours);
        let plan = self.plan_with_offset(&grid, now, clock_offset_hours);

        let schema = match (&plan.status, plan.schema) {
            (TabStatus::Ready, Some(schema)) => schema,
            _ => return Ok(TabReport::new(tab, plan.status.clone())),
        };

        let body = self.links.message_body(&plan.provider_token);
        let stamp = format_clock(now);
        let mut report = TabReport::new(tab, TabStatus::Ready);

        for row in &plan.eligible {
            let result = ctx.sender.send(&row.phone, &body).await;

            if result.success {
                info!("SMS sent to {} - Timestamp: {}", row.phone, stamp);
                let link_sent = append_link_sent(&row.link_sent, &stamp);
                report.sent_count += 1;
                report
                    .outcomes
                    .push(SendOutcome::sent(row.position, link_sent.clone()));

                if let Err(err) = ctx
                    .workbook
                    .write_cell(tab, row.position, schema.link_sent_column(), &link_sent)
                    .await
                {
                    return Err(TabFault::new(report, err));
                }
            } else {
                let failure = SendFailure {
                    provider_tab: tab.to_string(),
                    patient_name: row.patient_name.clone(),
                    appointment_time: row.raw_time.to_string(),
                    phone: row.phone.clone(),
                    error: result.error.unwrap_or_else(|| "Unknown error".to_string()),
                };

                warn!("Failed to send SMS to {}: {}", row.phone, failure.error);
                record_error(ctx.error_log, &failure.to_log_entry(now)).await;
                report.outcomes.push(SendOutcome::failed(row.position, failure));
            }
        }

        Ok(report)
    }
}

/// New `Link Sent` value: the stamp, appended after any existing history.
pub fn append_link_sent(existing: &str, stamp: &str) -> String {
    if existing.trim().is_empty() {
        stamp.to_string()
    } else {
        format!("{} {}", existing, stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate};
    use messaging_cell::{MockSmsSender, SendResult};
    use shared_models::CellValue;
    use workbook_cell::{InMemoryErrorLog, InMemoryWorkbook, WorkbookError};

    const HEADERS: &[&str] = &[
        "Name", "O/T", "Time", "Phone #", "Link Sent", "Appt With", "Follow Up", "DOB",
    ];

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 12)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn grid(rows: &[&[&str]]) -> TabGrid {
        let mut all: Vec<&[&str]> = vec![HEADERS];
        all.extend_from_slice(rows);
        TabGrid::from_text("Dr. Vivian Lee/PC", &all)
    }

    fn schedule() -> TabGrid {
        grid(&[
            &["Ann", "T", "10:00 AM", "555-0101", "", "", "", ""],
            &["Bob", "O", "8:00 AM", "555-0102", "", "", "", ""],
            &["Cy", "TF", "9:00 AM", "555-0103", "8:20", "", "", ""],
        ])
    }

    #[test]
    fn test_shift_gate_boundary() {
        let evaluator = EligibilityEvaluator::default();

        let early = evaluator.plan(&schedule(), at(8, 54));
        assert_eq!(early.status, TabStatus::ShiftNotStarted { opens_at: at(8, 55) });
        assert!(early.eligible.is_empty());

        let open = evaluator.plan(&schedule(), at(8, 55));
        assert_eq!(open.status, TabStatus::Ready);
        assert_eq!(open.shift.map(|shift| shift.earliest_appointment), Some(at(9, 0)));
        assert_eq!(open.eligible.len(), 2);
        assert_eq!(open.provider_token, "vivian");
    }

    #[test]
    fn test_lead_minutes_from_settings() {
        let evaluator = EligibilityEvaluator::new(ReminderSettings {
            lead_minutes: 30,
            ..ReminderSettings::default()
        });

        assert_matches!(evaluator.plan(&schedule(), at(8, 29)).status, TabStatus::ShiftNotStarted { .. });
        assert_eq!(evaluator.plan(&schedule(), at(8, 30)).status, TabStatus::Ready);
    }

    #[test]
    fn test_fail_open_without_parseable_times() {
        let evaluator = EligibilityEvaluator::default();
        let tab = grid(&[&["Ann", "T", "tbd", "555-0101", "", "", "", ""]]);

        let plan = evaluator.plan(&tab, at(0, 1));

        assert_eq!(plan.status, TabStatus::Ready);
        assert_eq!(plan.shift, None);
        assert_eq!(plan.eligible.len(), 1);
    }

    #[test]
    fn test_skip_reasons() {
        let evaluator = EligibilityEvaluator::default();
        let tab = grid(&[
            &["Ann", "T", "9:00 AM", "  ", "", "", "", ""],
            &["Bob", "T", "9:00 AM", "555-0102", "", "", "", "*"],
            &["Cy", "T", "9:00 AM", "555-0103", "", "", "seen", ""],
            &["Di", "T", "9:00 AM", "555-0104", "", "", "VM", "1/2/1980"],
        ]);

        let plan = evaluator.plan(&tab, at(12, 0));

        assert_eq!(
            plan.skipped,
            vec![
                (2, SkipReason::NoPhone),
                (3, SkipReason::IncompleteIntake),
                (4, SkipReason::AlreadySeen { note: "seen".to_string() }),
            ]
        );
        assert_eq!(plan.eligible.len(), 1);
        assert_eq!(plan.eligible[0].patient_name, "Di");
    }

    #[test]
    fn test_plan_statuses() {
        let evaluator = EligibilityEvaluator::default();

        let header_only = TabGrid::from_text("Lee", &[HEADERS]);
        assert_eq!(evaluator.plan(&header_only, at(12, 0)).status, TabStatus::NoData);

        let missing = TabGrid::from_text("Lee", &[&["Name", "Time"], &["Ann", "9:00"]]);
        assert_matches!(
            evaluator.plan(&missing, at(12, 0)).status,
            TabStatus::MissingColumns { missing } if missing == vec!["O/T", "Phone #", "Link Sent"]
        );

        let office_only = grid(&[&["Bob", "O", "9:00 AM", "555-0102", "", "", "", ""]]);
        assert_eq!(
            evaluator.plan(&office_only, at(12, 0)).status,
            TabStatus::NoTelehealthRows
        );
    }

    #[test]
    fn test_appt_with_names_the_provider() {
        let evaluator = EligibilityEvaluator::default();
        let tab = grid(&[&["Ann", "T", "9:00 AM", "555-0101", "", "Dr. John Smith", "", ""]]);

        assert_eq!(evaluator.plan(&tab, at(12, 0)).provider_token, "john");
    }

    #[test]
    fn test_append_link_sent() {
        assert_eq!(append_link_sent("8:20", "9:16 AM"), "8:20 9:16 AM");
        assert_eq!(append_link_sent("  ", "9:16 AM"), "9:16 AM");
        assert_eq!(append_link_sent("", "9:16 AM"), "9:16 AM");
    }

    #[tokio::test]
    async fn test_evaluate_sends_and_stamps_rows() {
        let workbook = InMemoryWorkbook::new("11-12-2025 appointment", vec![schedule()]);
        let error_log = InMemoryErrorLog::new();
        let mut sender = MockSmsSender::new();
        sender
            .expect_send()
            .withf(|_, body| body.ends_with("goldstandard.doxy.me/viviangsmg1."))
            .times(2)
            .returning(|_, _| SendResult::sent());

        let ctx = TabContext {
            workbook: &workbook,
            sender: &sender,
            error_log: &error_log,
        };
        let now = at(9, 16);
        let report = EligibilityEvaluator::default()
            .evaluate(&ctx, "Dr. Vivian Lee/PC", now)
            .await
            .unwrap();

        assert_eq!(report.sent_count, 2);
        assert_eq!(report.failure_count(), 0);
        assert_eq!(
            workbook.cell("Dr. Vivian Lee/PC", 2, 5).await,
            Some(CellValue::from("9:16 AM"))
        );
        assert_eq!(
            workbook.cell("Dr. Vivian Lee/PC", 4, 5).await,
            Some(CellValue::from("8:20 9:16 AM"))
        );
        assert_eq!(
            workbook.cell("Dr. Vivian Lee/PC", 3, 5).await,
            Some(CellValue::Empty)
        );
        assert!(error_log.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_evaluate_logs_failures_and_continues() {
        let workbook = InMemoryWorkbook::new("11-12-2025 appointment", vec![schedule()]);
        let error_log = InMemoryErrorLog::new();
        let mut sender = MockSmsSender::new();
        sender
            .expect_send()
            .withf(|phone, _| phone.ends_with("0101"))
            .times(1)
            .returning(|_, _| SendResult::failed("ClickSend API error: INVALID_RECIPIENT"));
        sender
            .expect_send()
            .withf(|phone, _| phone.ends_with("0103"))
            .times(1)
            .returning(|_, _| SendResult::sent());

        let ctx = TabContext {
            workbook: &workbook,
            sender: &sender,
            error_log: &error_log,
        };
        let now = at(9, 16);
        let report = EligibilityEvaluator::default()
            .evaluate(&ctx, "Dr. Vivian Lee/PC", now)
            .await
            .unwrap();

        assert_eq!(report.sent_count, 1);
        assert_eq!(report.failure_count(), 1);

        let entries = error_log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp, now);
        assert_eq!(entries[0].provider_tab, "Dr. Vivian Lee/PC");
        assert_eq!(entries[0].patient_name, "Ann");
        assert_eq!(entries[0].appointment_time, "10:00 AM");
        assert_eq!(entries[0].phone_number, "555-0101");
        assert_eq!(entries[0].error_message, "ClickSend API error: INVALID_RECIPIENT");
    }

    #[tokio::test]
    async fn test_write_fault_keeps_partial_report() {
        struct LockedWorkbook(InMemoryWorkbook);

        #[async_trait::async_trait]
        impl Workbook for LockedWorkbook {
            fn name(&self) -> &str {
                self.0.name()
            }

            async fn tab_names(&self) -> Result<Vec<String>, WorkbookError> {
                self.0.tab_names().await
            }

            async fn read_tab(&self, tab: &str) -> Result<TabGrid, WorkbookError> {
                self.0.read_tab(tab).await
            }

            async fn write_cell(
                &self,
                _tab: &str,
                _row: usize,
                _column: usize,
                _value: &str,
            ) -> Result<(), WorkbookError> {
                Err(WorkbookError::Api("protected range".to_string()))
            }
        }

        let workbook = LockedWorkbook(InMemoryWorkbook::new(
            "11-12-2025 appointment",
            vec![schedule()],
        ));
        let error_log = InMemoryErrorLog::new();
        let mut sender = MockSmsSender::new();
        sender
            .expect_send()
            .times(1)
            .returning(|_, _| SendResult::sent());

        let ctx = TabContext {
            workbook: &workbook,
            sender: &sender,
            error_log: &error_log,
        };
        let fault = EligibilityEvaluator::default()
            .evaluate(&ctx, "Dr. Vivian Lee/PC", at(9, 16))
            .await
            .unwrap_err();

        assert_eq!(fault.report.sent_count, 1);
        assert_eq!(fault.report.outcomes.len(), 1);
        assert_eq!(fault.to_string(), "Google API error: protected range");
    }

    #[tokio::test]
    async fn test_workbook_offset_overrides_settings() {
        struct DisplayedClockWorkbook(InMemoryWorkbook);

        #[async_trait::async_trait]
        impl Workbook for DisplayedClockWorkbook {
            fn name(&self) -> &str {
                self.0.name()
            }

            fn clock_offset_hours(&self) -> Option<i64> {
                Some(0)
            }

            async fn tab_names(&self) -> Result<Vec<String>, WorkbookError> {
                self.0.tab_names().await
            }

            async fn read_tab(&self, tab: &str) -> Result<TabGrid, WorkbookError> {
                self.0.read_tab(tab).await
            }

            async fn write_cell(
                &self,
                tab: &str,
                row: usize,
                column: usize,
                value: &str,
            ) -> Result<(), WorkbookError> {
                self.0.write_cell(tab, row, column, value).await
            }
        }

        let mut tab = grid(&[&["Ann", "T", "", "555-0101", "", "", "", ""]]);
        tab.set_cell(2, 3, CellValue::Clock(chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        let workbook = DisplayedClockWorkbook(InMemoryWorkbook::new("today", vec![tab]));
        let error_log = InMemoryErrorLog::new();
        let mut sender = MockSmsSender::new();
        sender.expect_send().never();

        let ctx = TabContext {
            workbook: &workbook,
            sender: &sender,
            error_log: &error_log,
        };
        let report = EligibilityEvaluator::default()
            .evaluate(&ctx, "Dr. Vivian Lee/PC", at(8, 54))
            .await
            .unwrap();

        assert_eq!(report.status, TabStatus::ShiftNotStarted { opens_at: at(8, 55) });
    }

    #[tokio::test]
    async fn test_evaluate_before_shift_sends_nothing() {
        let workbook = InMemoryWorkbook::new("11-12-2025 appointment", vec![schedule()]);
        let error_log = InMemoryErrorLog::new();
        let mut sender = MockSmsSender::new();
        sender.expect_send().never();

        let ctx = TabContext {
            workbook: &workbook,
            sender: &sender,
            error_log: &error_log,
        };
        let report = EligibilityEvaluator::default()
            .evaluate(&ctx, "Dr. Vivian Lee/PC", at(9, 0) - Duration::minutes(6))
            .await
            .unwrap();

        assert_eq!(report.sent_count, 0);
        assert_matches!(report.status, TabStatus::ShiftNotStarted { .. });
    }
}

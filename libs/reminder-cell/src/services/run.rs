// libs/reminder-cell/src/services/run.rs
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{error, info, instrument, warn};

use messaging_cell::SmsSender;
use shared_config::AppConfig;
use shared_utils::format_clock;
use workbook_cell::{ErrorLogEntry, ErrorLogSink, WorkbookError, WorkbookSource};

use crate::error::ReminderError;
use crate::models::RunSummary;

use super::eligibility::{EligibilityEvaluator, ReminderSettings, TabContext};
use super::record_error;

/// One pass over today's workbook.
pub struct RunController {
    source: Arc<dyn WorkbookSource>,
    sender: Arc<dyn SmsSender>,
    error_log: Arc<dyn ErrorLogSink>,
    evaluator: EligibilityEvaluator,
    stop_at_tabs: Vec<String>,
}

impl RunController {
    pub fn new(
        config: &AppConfig,
        source: Arc<dyn WorkbookSource>,
        sender: Arc<dyn SmsSender>,
        error_log: Arc<dyn ErrorLogSink>,
    ) -> Self {
        Self::with_settings(
            ReminderSettings::from_config(config),
            config.stop_at_tabs.clone(),
            source,
            sender,
            error_log,
        )
    }

    pub fn with_settings(
        settings: ReminderSettings,
        stop_at_tabs: Vec<String>,
        source: Arc<dyn WorkbookSource>,
        sender: Arc<dyn SmsSender>,
        error_log: Arc<dyn ErrorLogSink>,
    ) -> Self {
        Self {
            source,
            sender,
            error_log,
            evaluator: EligibilityEvaluator::new(settings),
            stop_at_tabs,
        }
    }

    /// Runs the whole pass. Faults that escape the tab loop end the run and are
    /// written to the error log as `System` entries; counts so far are kept.
    #[instrument(skip(self))]
    pub async fn run_once(&self, now: NaiveDateTime) -> RunSummary {
        info!("=== Starting Telehealth SMS Send Process ===");
        info!("Current time: {}", now);

        let mut summary = RunSummary::default();
        if let Err(err) = self.process(now, &mut summary).await {
            error!("CRITICAL ERROR: {}", err);
            record_error(
                self.error_log.as_ref(),
                &ErrorLogEntry::system(now, err.to_string()),
            )
            .await;
        }

        summary
    }

    async fn process(
        &self,
        now: NaiveDateTime,
        summary: &mut RunSummary,
    ) -> Result<(), ReminderError> {
        let workbook = match self.source.find_todays_workbook(now.date()).await {
            Ok(Some(workbook)) => workbook,
            Ok(None) => {
                info!("No appointment sheet found for today");
                return Ok(());
            }
            Err(err @ WorkbookError::UnsupportedFormat { .. }) => {
                error!("{}", err);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        info!("Found sheet: {}", workbook.name());
        summary.workbook = Some(workbook.name().to_string());

        let tabs = workbook.tab_names().await?;
        self.log_stop_tabs(&tabs);

        let ctx = TabContext {
            workbook: workbook.as_ref(),
            sender: self.sender.as_ref(),
            error_log: self.error_log.as_ref(),
        };

        for tab in &tabs {
            if let Some(marker) = self.stop_marker_for(tab) {
                info!("Reached stop tab: {} (marker {:?}). Ending processing.", tab, marker);
                summary.stopped_at = Some(tab.clone());
                break;
            }

            info!("Processing tab: {}", tab);
            match self.evaluator.evaluate(&ctx, tab, now).await {
                Ok(report) => {
                    summary.messages_sent += report.sent_count;
                    summary.send_failures += report.failure_count();
                }
                Err(fault) => {
                    summary.messages_sent += fault.report.sent_count;
                    summary.send_failures += fault.report.failure_count();

                    error!("Error processing tab {}: {}", tab, fault);
                    record_error(
                        self.error_log.as_ref(),
                        &ErrorLogEntry::for_scope(now, tab, fault.to_string()),
                    )
                    .await;
                }
            }
            summary.tabs_processed += 1;
        }

        info!("=== Process Complete at {} ===", format_clock(now));
        info!("Providers processed: {}", summary.tabs_processed);
        info!("SMS messages sent: {}", summary.messages_sent);
        Ok(())
    }

    /// The configured marker contained in `tab`, compared case-insensitively.
    pub fn stop_marker_for(&self, tab: &str) -> Option<&str> {
        let name = tab.to_lowercase();
        self.stop_at_tabs
            .iter()
            .map(|marker| marker.trim())
            .filter(|marker| !marker.is_empty())
            .find(|marker| name.contains(&marker.to_lowercase()))
    }

    fn log_stop_tabs(&self, tabs: &[String]) {
        let present = tabs
            .iter()
            .any(|tab| self.stop_at_tabs.iter().any(|marker| marker == tab));

        if present {
            info!("Using stop tabs: {}", self.stop_at_tabs.join(", "));
        } else {
            warn!("None of the configured stop tabs found, proceeding with all tabs");
        }
    }
}

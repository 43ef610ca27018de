use std::sync::Arc;

use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use messaging_cell::ClickSendClient;
use reminder_cell::RunController;
use shared_config::AppConfig;
use shared_google::GoogleApiClient;
use shared_models::AppError;
use shared_utils::clinic_now;
use workbook_cell::{DriveWorkbookSource, ErrorLogSink, InMemoryErrorLog, SheetsErrorLog};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reqwest=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting telehealth SMS sender");

    let config = AppConfig::from_env();
    let google = Arc::new(GoogleApiClient::new(&config));

    let source = Arc::new(DriveWorkbookSource::new(&config, Arc::clone(&google))?);
    let sender = Arc::new(ClickSendClient::new(&config)?);
    let error_log: Arc<dyn ErrorLogSink> = match SheetsErrorLog::new(&config, google) {
        Ok(log) => Arc::new(log),
        Err(err) => {
            warn!("Error log sheet unavailable ({}); errors go to the process log only", err);
            Arc::new(InMemoryErrorLog::new())
        }
    };

    let now = clinic_now(config.clinic_timezone);
    let summary = RunController::new(&config, source, sender, error_log)
        .run_once(now)
        .await;

    info!(
        workbook = summary.workbook.as_deref().unwrap_or("none"),
        tabs_processed = summary.tabs_processed,
        messages_sent = summary.messages_sent,
        send_failures = summary.send_failures,
        "Run finished"
    );

    Ok(())
}

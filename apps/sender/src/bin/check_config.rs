//! Prints the effective configuration and whether today's workbook can be found.

use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shared_config::AppConfig;
use shared_google::GoogleApiClient;
use shared_models::AppError;
use shared_utils::{clinic_now, workbook_date_tokens};
use workbook_cell::{DriveWorkbookSource, WorkbookSource};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Testing configuration...");

    let config = AppConfig::from_env();
    let now = clinic_now(config.clinic_timezone);

    info!("ClickSend Username: {}", config.clicksend_username);
    info!(
        "ClickSend API Key: {}",
        if config.clicksend_api_key.is_empty() { "NOT SET" } else { "Set" }
    );
    info!("Current time: {}", now);
    info!("Time zone: {}", config.clinic_timezone);
    info!("Stop tabs: {}", config.stop_at_tabs.join(", "));
    info!("Workbook date tokens: {}", workbook_date_tokens(now.date()).join(" or "));

    let google = Arc::new(GoogleApiClient::new(&config));
    let source = DriveWorkbookSource::new(&config, google)?;

    match source.find_todays_workbook(now.date()).await {
        Ok(Some(workbook)) => {
            info!("Found appointment sheet: {}", workbook.name());
            let tabs = workbook.tab_names().await?;
            info!("Number of tabs: {}", tabs.len());
        }
        Ok(None) => info!("No appointment sheet found for today"),
        Err(err) => {
            error!("Workbook lookup failed: {}", err);
            return Err(err.into());
        }
    }

    Ok(())
}

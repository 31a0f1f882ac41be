//! Listings ETL - Main entry point

use anyhow::Result;
use listings_common::logging::{init_logging, LogConfig};
use listings_etl::{config::EtlConfig, pipeline};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // LOG_* and DB_* settings may come from .env
    dotenvy::dotenv().ok();

    let log_config = LogConfig::builder()
        .log_file_prefix("listings-etl")
        .filter_directives("sqlx=warn")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let config = EtlConfig::from_env()?;
    let summary = pipeline::run(&config).await?;

    if summary.load.is_loaded() {
        info!(
            extracted = summary.extracted,
            skipped = summary.skipped,
            "ETL run complete"
        );
    } else {
        warn!(
            extracted = summary.extracted,
            skipped = summary.skipped,
            "ETL run finished without loading"
        );
    }

    Ok(())
}

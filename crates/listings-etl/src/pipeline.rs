//! Extract → load orchestration

use listings_common::Result;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::EtlConfig;
use crate::extract::extract;
use crate::load::{load, LoadReport};

/// How the load stage ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded(LoadReport),
    /// The load was aborted; the error has already been logged
    Failed { error: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Result of one full run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    /// Listings that passed cleaning
    pub extracted: usize,
    /// Source rows dropped during cleaning
    pub skipped: usize,
    pub load: LoadOutcome,
}

/// Run the pipeline once: extract and clean the CSV, then load it.
///
/// A failed load is logged and reported in the summary rather than returned
/// as an error. Only a source file that cannot be read fails the run.
#[instrument(skip_all, fields(csv_path = %config.csv_path.display()))]
pub async fn run(config: &EtlConfig) -> Result<PipelineSummary> {
    info!("Starting Airbnb ETL process");

    let extraction = extract(&config.csv_path)?;
    info!("{} records ready to load", extraction.listings.len());

    let outcome = match load(&config.database, &extraction.listings).await {
        Ok(report) => {
            info!(
                inserted = report.inserted,
                skipped_existing = report.skipped_existing,
                "Data loaded successfully"
            );
            LoadOutcome::Loaded(report)
        },
        Err(e) => {
            error!(error = %e, "Database load failed");
            LoadOutcome::Failed {
                error: e.to_string(),
            }
        },
    };

    Ok(PipelineSummary {
        extracted: extraction.listings.len(),
        skipped: extraction.skipped.len(),
        load: outcome,
    })
}

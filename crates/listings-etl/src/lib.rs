//! Listings ETL Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Batch loader for Airbnb listing exports: reads the listings CSV, cleans
//! each row, and inserts the result into the `airbnb_listings` table of a
//! PostgreSQL database.
//!
//! # Stages
//!
//! - **Extract/Transform** ([`extract`], [`transform`]): parse the file,
//!   coerce ids and counts to integers, normalize prices, drop bad rows.
//! - **Load** ([`load`]): create the table if needed and insert each listing,
//!   leaving already loaded ids untouched.
//!
//! # Example
//!
//! ```no_run
//! use listings_etl::{config::EtlConfig, pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EtlConfig::from_env()?;
//!     let summary = pipeline::run(&config).await?;
//!     assert!(summary.load.is_loaded());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod record;
pub mod transform;

pub use extract::{Extraction, SkippedRow};
pub use load::LoadReport;
pub use record::Listing;
pub use transform::SkipReason;

//! Listings ETL Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging setup for the listings ETL workspace.
//!
//! - **Error Handling**: [`EtlError`] and the [`Result`] alias
//! - **Logging**: process-wide `tracing` subscriber configuration
//!
//! # Example
//!
//! ```no_run
//! use listings_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!
//!     info!("Pipeline started");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{EtlError, Result};

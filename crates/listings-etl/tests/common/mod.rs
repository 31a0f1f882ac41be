//! Shared helpers for listings ETL integration tests
//!
//! Database tests start a throwaway PostgreSQL container through
//! testcontainers, so they need a running Docker daemon and are marked
//! `#[ignore = "requires Docker"]`. Run them with:
//!
//! ```bash
//! cargo test -p listings-etl -- --ignored
//! ```

#![allow(dead_code)]

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use listings_etl::{db::DbConfig, Listing};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::BigDecimal;
use sqlx::PgPool;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tempfile::TempDir;
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use tracing::{debug, info};

/// Header row of a listings export, including columns the ETL ignores
pub const LISTINGS_HEADER: &str =
    "id,name,host_id,neighbourhood,room_type,price,minimum_nights,availability_365,last_review";

// ============================================================================
// PostgreSQL Test Container
// ============================================================================

/// PostgreSQL container with a small pool for assertions.
///
/// The container is stopped when this value is dropped.
pub struct TestPostgres {
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
    connection_string: String,
}

impl TestPostgres {
    pub async fn start() -> Result<Self> {
        info!("Starting PostgreSQL test container...");

        let container = Postgres::default()
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .context("Failed to get container port")?;

        let connection_string =
            format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);
        debug!("PostgreSQL connection: {}", connection_string);

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        Ok(Self {
            _container: container,
            pool,
            connection_string,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connection settings pointing the loader at this container
    pub fn db_config(&self) -> DbConfig {
        DbConfig::from_url(self.connection_string.clone())
    }

    pub async fn row_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM airbnb_listings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A CSV file in its own temporary directory
pub struct CsvFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl CsvFixture {
    /// Write `rows` under [`LISTINGS_HEADER`]
    pub fn with_rows(rows: &[&str]) -> Result<Self> {
        let mut contents = String::from(LISTINGS_HEADER);
        contents.push('\n');
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        Self::from_contents(contents.as_bytes())
    }

    pub fn from_contents(contents: &[u8]) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("listings.csv");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(contents)?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

pub fn decimal(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("valid decimal literal")
}

pub fn fixed_time() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-10-15 09:30:00", "%Y-%m-%d %H:%M:%S")
        .expect("valid timestamp literal")
}

pub fn listing(id: i64, name: &str, price: Option<&str>) -> Listing {
    Listing {
        id,
        name: Some(name.to_string()),
        neighbourhood: Some("Downtown".to_string()),
        room_type: Some("Entire home/apt".to_string()),
        price: price.map(decimal),
        minimum_nights: 2,
        availability_365: 180,
        scraped_date: fixed_time(),
    }
}

/// Install a test-friendly tracing subscriber once per test binary
pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,listings_etl=debug,sqlx=warn,testcontainers=info")
        }))
        .with_test_writer()
        .try_init();
}

//! Loading listings into PostgreSQL
//!
//! The destination table is created on first use. Inserts use
//! `ON CONFLICT (id) DO NOTHING`, so an id that is already present keeps the
//! row from its first load and repeated runs are harmless. Statements run in
//! autocommit on one connection: rows written before a failing insert stay
//! committed.

use serde::Serialize;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tracing::{debug, info, instrument, warn};

use crate::db::{connect, DbConfig, DbError, DbResult};
use crate::record::Listing;

/// Destination table
pub const TABLE_NAME: &str = "airbnb_listings";

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS airbnb_listings (
        id BIGINT PRIMARY KEY,
        name TEXT,
        neighbourhood TEXT,
        room_type TEXT,
        price NUMERIC,
        minimum_nights INT,
        availability_365 INT,
        scraped_date TIMESTAMP
    )
"#;

const INSERT_LISTING_SQL: &str = r#"
    INSERT INTO airbnb_listings (
        id, name, neighbourhood, room_type, price,
        minimum_nights, availability_365, scraped_date
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (id) DO NOTHING
"#;

/// Counts from one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows written by this load
    pub inserted: u64,
    /// Listings whose id was already in the table
    pub skipped_existing: u64,
}

/// Create the destination table if it does not exist yet.
pub async fn ensure_schema(conn: &mut PgConnection) -> DbResult<()> {
    sqlx::query(CREATE_TABLE_SQL)
        .execute(&mut *conn)
        .await
        .map_err(|source| DbError::Schema {
            table: TABLE_NAME,
            source,
        })?;

    debug!(table = TABLE_NAME, "Destination table ready");
    Ok(())
}

/// Insert one listing. Returns `false` when its id was already loaded.
pub async fn insert_listing(conn: &mut PgConnection, listing: &Listing) -> DbResult<bool> {
    let result = sqlx::query(INSERT_LISTING_SQL)
        .bind(listing.id)
        .bind(&listing.name)
        .bind(&listing.neighbourhood)
        .bind(&listing.room_type)
        .bind(&listing.price)
        .bind(listing.minimum_nights)
        .bind(listing.availability_365)
        .bind(listing.scraped_date)
        .execute(&mut *conn)
        .await
        .map_err(|source| DbError::Insert {
            id: listing.id,
            source,
        })?;

    Ok(result.rows_affected() == 1)
}

/// Ensure the table exists, then insert `listings` one at a time in order.
///
/// The first error other than an existing id stops the load; nothing after
/// it is attempted.
#[instrument(skip_all, fields(records = listings.len()))]
pub async fn load_listings(conn: &mut PgConnection, listings: &[Listing]) -> DbResult<LoadReport> {
    ensure_schema(conn).await?;

    let mut report = LoadReport::default();

    for listing in listings {
        if insert_listing(conn, listing).await? {
            report.inserted += 1;
        } else {
            debug!(id = listing.id, "Listing already loaded, skipping");
            report.skipped_existing += 1;
        }
    }

    info!(
        inserted = report.inserted,
        skipped_existing = report.skipped_existing,
        "Listings written"
    );

    Ok(report)
}

/// Open a connection, load `listings` through it, and close it again.
///
/// The connection is closed whether or not the load succeeded.
pub async fn load(config: &DbConfig, listings: &[Listing]) -> DbResult<LoadReport> {
    let mut conn = connect(config).await?;

    let result = load_listings(&mut conn, listings).await;

    if let Err(e) = conn.close().await {
        warn!(error = %e, "Database connection did not close cleanly");
    }

    result
}

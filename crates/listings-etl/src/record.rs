//! Normalized listing record

use chrono::NaiveDateTime;
use sqlx::types::BigDecimal;

/// Source column holding the listing id (primary key)
pub const COL_ID: &str = "id";
pub const COL_NAME: &str = "name";
pub const COL_NEIGHBOURHOOD: &str = "neighbourhood";
pub const COL_ROOM_TYPE: &str = "room_type";
pub const COL_PRICE: &str = "price";
pub const COL_MINIMUM_NIGHTS: &str = "minimum_nights";
pub const COL_AVAILABILITY_365: &str = "availability_365";

/// Columns every source file header must provide
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_ID,
    COL_NAME,
    COL_NEIGHBOURHOOD,
    COL_ROOM_TYPE,
    COL_PRICE,
    COL_MINIMUM_NIGHTS,
    COL_AVAILABILITY_365,
];

/// One cleaned listing, ready to load.
///
/// Only built by the transform step, so the integer fields are always
/// present and valid. Text fields are `None` when the source row was too
/// short to reach that column; an empty cell stays `Some("")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub name: Option<String>,
    pub neighbourhood: Option<String>,
    pub room_type: Option<String>,
    /// `None` when the source price could not be read as a number
    pub price: Option<BigDecimal>,
    pub minimum_nights: i32,
    pub availability_365: i32,
    /// UTC wall clock at the moment this row was processed.
    ///
    /// Always UTC, never the host's local time, so loads from hosts in
    /// different zones stay comparable in the zone-less `TIMESTAMP` column.
    pub scraped_date: NaiveDateTime,
}

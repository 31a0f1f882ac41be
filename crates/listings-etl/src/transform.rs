//! Row coercion: raw CSV cells into a [`Listing`]
//!
//! A row either becomes a complete `Listing` or is rejected with a
//! [`SkipReason`]. There is no partially filled record: a row whose id,
//! minimum nights or availability cannot be read as an integer is dropped.
//! A bad price never drops a row, it only clears the price.

use chrono::NaiveDateTime;
use csv::StringRecord;
use sqlx::types::BigDecimal;
use std::str::FromStr;
use thiserror::Error;

use crate::record::{
    Listing, COL_AVAILABILITY_365, COL_ID, COL_MINIMUM_NIGHTS, COL_NAME, COL_NEIGHBOURHOOD,
    COL_PRICE, COL_ROOM_TYPE, REQUIRED_COLUMNS,
};

/// Why a source row was left out of the extraction output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' is not an integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },

    #[error("malformed row: {message}")]
    Malformed { message: String },
}

impl SkipReason {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// One source row viewed through the file's header row.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl<'a> RawRecord<'a> {
    pub fn new(headers: &'a StringRecord, record: &'a StringRecord) -> Self {
        Self { headers, record }
    }

    /// Whether the header row names `field` at all
    pub fn has_column(&self, field: &str) -> bool {
        self.column_index(field).is_some()
    }

    /// Raw cell for `field`, or `None` if the header lacks the column or the
    /// row ends before it.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.column_index(field)
            .and_then(|index| self.record.get(index))
    }

    fn column_index(&self, field: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == field)
    }
}

/// Strip `$` and `,` from a price cell and read it as a decimal.
///
/// Returns `None` for anything that is not a number once cleaned, including
/// the empty string, and for values a PostgreSQL `NUMERIC` column cannot
/// hold (e.g. `1e-20000`).
///
/// ```
/// use listings_etl::transform::clean_price;
/// use std::str::FromStr;
///
/// let price = clean_price("$1,234.56").unwrap();
/// assert_eq!(price, sqlx::types::BigDecimal::from_str("1234.56").unwrap());
/// assert!(clean_price("free").is_none());
/// ```
pub fn clean_price(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return None;
    }

    let value = BigDecimal::from_str(cleaned).ok()?;
    if fits_numeric(&value) {
        return Some(value);
    }

    // Trailing zeros can push the scale past the limit on their own
    let value = value.normalized();
    fits_numeric(&value).then_some(value)
}

/// Most digits PostgreSQL `NUMERIC` keeps after the decimal point
const NUMERIC_MAX_SCALE: i64 = 16_383;

/// Most digits PostgreSQL `NUMERIC` keeps before the decimal point
const NUMERIC_MAX_INTEGER_DIGITS: i128 = 131_072;

fn fits_numeric(value: &BigDecimal) -> bool {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    if scale > NUMERIC_MAX_SCALE {
        return false;
    }

    let mantissa_digits = mantissa.to_string().trim_start_matches('-').len() as i128;
    mantissa_digits - i128::from(scale) <= NUMERIC_MAX_INTEGER_DIGITS
}

/// Read a required integer column, ignoring surrounding whitespace.
pub fn parse_int<T: FromStr>(field: &'static str, raw: Option<&str>) -> Result<T, SkipReason> {
    let raw = raw.ok_or(SkipReason::MissingField { field })?;

    raw.trim().parse().map_err(|_| SkipReason::InvalidInteger {
        field,
        value: raw.to_string(),
    })
}

/// Coerce one raw row into a [`Listing`] stamped with `scraped_at`.
pub fn transform_record(
    raw: &RawRecord<'_>,
    scraped_at: NaiveDateTime,
) -> Result<Listing, SkipReason> {
    if let Some(field) = REQUIRED_COLUMNS.into_iter().find(|col| !raw.has_column(col)) {
        return Err(SkipReason::MissingField { field });
    }

    let id = parse_int(COL_ID, raw.get(COL_ID))?;
    let name = raw.get(COL_NAME).map(str::to_string);
    let neighbourhood = raw.get(COL_NEIGHBOURHOOD).map(str::to_string);
    let room_type = raw.get(COL_ROOM_TYPE).map(str::to_string);
    let price = raw.get(COL_PRICE).and_then(clean_price);
    let minimum_nights = parse_int(COL_MINIMUM_NIGHTS, raw.get(COL_MINIMUM_NIGHTS))?;
    let availability_365 = parse_int(COL_AVAILABILITY_365, raw.get(COL_AVAILABILITY_365))?;

    Ok(Listing {
        id,
        name,
        neighbourhood,
        room_type,
        price,
        minimum_nights,
        availability_365,
        scraped_date: scraped_at,
    })
}

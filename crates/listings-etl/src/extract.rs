//! Source file extraction
//!
//! Reads the listings CSV (header row first) and runs every record through
//! [`transform_record`]. Rows that fail are logged and collected as
//! [`SkippedRow`]s; extraction carries on with the next row. Only a failure
//! to open or read the file itself stops the stage.

use chrono::Utc;
use csv::{ErrorKind, ReaderBuilder, StringRecord};
use listings_common::{EtlError, Result};
use std::io;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::record::Listing;
use crate::transform::{transform_record, RawRecord, SkipReason};

/// A source row left out of the output, with the 1-based line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: SkipReason,
}

/// Output of the extract/transform stage, in source file order
#[derive(Debug, Default)]
pub struct Extraction {
    pub listings: Vec<Listing>,
    pub skipped: Vec<SkippedRow>,
}

impl Extraction {
    fn skip(&mut self, line: u64, reason: SkipReason) {
        warn!(line, reason = %reason, "Skipping row due to error");
        self.skipped.push(SkippedRow { line, reason });
    }
}

/// Extract and clean every listing in the CSV file at `path`.
///
/// The file handle is closed before this returns.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn extract(path: &Path) -> Result<Extraction> {
    let reader = reader_builder()
        .from_path(path)
        .map_err(|e| EtlError::source_file(path, e))?;

    let extraction = extract_records(reader).map_err(|e| EtlError::source_file(path, e))?;

    info!(
        extracted = extraction.listings.len(),
        skipped = extraction.skipped.len(),
        "Extraction finished"
    );

    Ok(extraction)
}

/// Same as [`extract`] for CSV data that is already open or in memory.
pub fn extract_from_reader<R: io::Read>(source: R) -> Result<Extraction> {
    let extraction = extract_records(reader_builder().from_reader(source))?;
    Ok(extraction)
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // Ragged rows must reach the transform step so they are skipped one by one
    builder.has_headers(true).flexible(true);
    builder
}

fn extract_records<R: io::Read>(mut reader: csv::Reader<R>) -> std::result::Result<Extraction, csv::Error> {
    let headers = reader.headers()?.clone();
    debug!(columns = headers.len(), "Read header row");

    let mut extraction = Extraction::default();
    let mut record = StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map_or(0, |p| p.line());
                let raw = RawRecord::new(&headers, &record);

                match transform_record(&raw, Utc::now().naive_utc()) {
                    Ok(listing) => extraction.listings.push(listing),
                    Err(reason) => extraction.skip(line, reason),
                }
            },
            Err(err) if is_row_error(&err) => {
                let line = err.position().map_or(0, |p| p.line());
                extraction.skip(line, SkipReason::malformed(err.to_string()));
            },
            Err(err) => return Err(err),
        }
    }

    Ok(extraction)
}

/// Errors confined to one record; anything else means the file is unreadable.
///
/// Ragged rows never error here (the reader is flexible); the transform step
/// rejects them.
fn is_row_error(err: &csv::Error) -> bool {
    matches!(err.kind(), ErrorKind::Utf8 { .. })
}

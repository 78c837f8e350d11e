//! CSV loader for parking sessions.
//!
//! Decoding is driven by the header row, so column order does not matter and
//! extra columns are ignored. The only rows discarded are those without a
//! `bay_id`; bad numbers survive as NaN. Bytes that are not valid UTF-8 are
//! replaced with U+FFFD rather than failing the row.

use std::io::Read;

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::fetch::read_source;
use crate::record::ParkingRecord;

/// Whole-resource failures. Row-level problems never surface here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not load {location}: {reason}")]
    Unavailable { location: String, reason: String },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A CSV row before validation. Every column is optional text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    bay_id: Option<String>,
    license_plate: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    arrival_time: Option<String>,
    duration_seconds: Option<String>,
}

impl RawRow {
    fn into_record(self) -> Option<ParkingRecord> {
        let bay_id = self.bay_id.filter(|id| !id.is_empty())?;

        Some(ParkingRecord {
            bay_id,
            license_plate: self.license_plate,
            latitude: parse_number(self.latitude.as_deref()),
            longitude: parse_number(self.longitude.as_deref()),
            arrival_time: self.arrival_time.filter(|t| !t.is_empty()),
            duration_seconds: parse_number(self.duration_seconds.as_deref()),
        })
    }
}

fn parse_number(cell: Option<&str>) -> f64 {
    cell.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN)
}

/// Decodes CSV text into records, dropping rows with no `bay_id`.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if the input is not readable as CSV, for example
/// an I/O failure on `reader`.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<ParkingRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = StringRecord::from_byte_record_lossy(rdr.byte_headers()?.clone());
    let mut raw = ByteRecord::new();
    let mut records = Vec::new();
    let mut dropped = 0usize;

    while rdr.read_byte_record(&mut raw)? {
        let row = StringRecord::from_byte_record_lossy(raw.clone());
        match row.deserialize::<RawRow>(Some(&headers))?.into_record() {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    debug!(kept = records.len(), dropped, "CSV rows decoded");
    Ok(records)
}

/// Reads `source` (a path or an http(s) URL) and decodes it.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_records(source: &str) -> Result<Vec<ParkingRecord>, LoadError> {
    let bytes = read_source(source)
        .await
        .map_err(|e| LoadError::Unavailable {
            location: source.to_string(),
            reason: format!("{e:#}"),
        })?;

    let records = parse_records(bytes.as_slice())?;
    info!(records = records.len(), "Parking records loaded");
    Ok(records)
}

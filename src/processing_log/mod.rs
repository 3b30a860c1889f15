//! Append-only processing log.
//!
//! Every successful batch records which (Job No, BE No) pairs were put on a
//! waybill, with which vehicle, and when. The store is a flat CSV file that
//! grows forever; [`LogStore`] is the seam where a transactional store could
//! replace it without touching the transform.

pub mod handlers;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One processed (job, document) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "Job No")]
    pub job_no: String,
    #[serde(rename = "BE No")]
    pub be_no: String,
    #[serde(rename = "Vehicle No")]
    pub vehicle_no: String,
    /// Batch timestamp, [`TIMESTAMP_FORMAT`].
    #[serde(rename = "Processed Date")]
    pub processed_date: String,
}

impl LogEntry {
    /// Date component of the processed timestamp, if it parses.
    pub fn processed_on(&self) -> Option<NaiveDate> {
        NaiveDateTime::parse_from_str(&self.processed_date, TIMESTAMP_FORMAT)
            .ok()
            .map(|dt| dt.date())
    }
}

#[derive(Debug, Error)]
pub enum LogStoreError {
    #[error("could not open log store: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not read or write log rows: {0}")]
    Csv(#[from] csv::Error),
}

/// Persistent append-only store of [`LogEntry`] rows.
pub trait LogStore {
    /// Append a batch. The store is created with a header row on first use;
    /// later appends add rows only.
    fn append(&mut self, entries: &[LogEntry]) -> Result<(), LogStoreError>;

    /// All entries whose processed timestamp falls on `date`. An empty
    /// result is a valid outcome, not an error.
    fn query_by_date(&self, date: NaiveDate) -> Result<Vec<LogEntry>, LogStoreError>;
}

/// [`LogStore`] over a flat CSV file.
///
/// Appends are not coordinated across processes; the caller serializes
/// writers within this process.
#[derive(Debug)]
pub struct CsvLogStore {
    path: PathBuf,
}

impl CsvLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStore for CsvLogStore {
    fn append(&mut self, entries: &[LogEntry]) -> Result<(), LogStoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let exists = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!exists)
            .from_writer(file);
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn query_by_date(&self, date: NaiveDate) -> Result<Vec<LogEntry>, LogStoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut matching = Vec::new();
        for row in reader.deserialize() {
            let entry: LogEntry = row?;
            if entry.processed_on() == Some(date) {
                matching.push(entry);
            }
        }
        Ok(matching)
    }
}

/// Render entries as a standalone CSV document, header included, for the
/// date-filtered log download.
pub fn entries_to_csv(entries: &[LogEntry]) -> Result<Vec<u8>, LogStoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if entries.is_empty() {
        // serde only emits the header alongside a first record; write it
        // explicitly so an empty day still downloads as a valid file.
        writer.write_record(["Job No", "BE No", "Vehicle No", "Processed Date"])?;
    }
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(writer.into_inner().unwrap_or_default())
}

//! Tabular input normalization.
//!
//! The Import Job Register arrives as an XLSX workbook and the Item Report as
//! a CSV file. Both are folded into the same in-memory [`Sheet`] shape so the
//! transform can join and read them without caring about the source format.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while reading an uploaded file into a [`Sheet`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read Excel workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
    #[error("could not read CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// A single cell value, normalized across XLSX and CSV sources.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

const EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Render the cell as text, trimmed.
    ///
    /// Integral floats drop the trailing fraction so a numeric BE number read
    /// from XLSX joins against its textual CSV counterpart.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_cell_number(*n),
            Cell::DateTime(dt) => dt.format("%d-%m-%Y").to_string(),
        }
    }

    /// Untrimmed text content. Free-text columns such as the importer address
    /// keep their raw spacing; callers trim at the point of use.
    pub fn as_raw_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            other => other.as_text(),
        }
    }
}

fn format_cell_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse a cell as a decimal number, accepting thousands separators.
/// Missing or unparseable values coerce to zero, never an error.
pub fn lenient_number(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Like [`lenient_number`] but distinguishes "not a number" so pass-through
/// columns (quantity, rate) can keep their original text when unparseable.
pub fn maybe_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// A header row plus data rows.
#[derive(Debug, Clone)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Read one worksheet of an XLSX workbook. The first row is the header.
    pub fn from_xlsx_bytes(bytes: &[u8], sheet_name: &str) -> Result<Self, IngestError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        let range = workbook.worksheet_range(sheet_name)?;

        let mut rows_iter = range.rows();
        let headers = match rows_iter.next() {
            Some(header_row) => header_row.iter().map(|c| convert(c).as_text()).collect(),
            None => Vec::new(),
        };
        let rows = rows_iter
            .map(|row| row.iter().map(convert).collect())
            .collect();

        Ok(Self { headers, rows })
    }

    /// Read a headered CSV file. Every field arrives as text; numeric
    /// interpretation happens later, per column.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required columns absent from this sheet, in the order requested.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Cell at (row, column); ragged rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::Error(_) => Cell::Empty,
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(parsed) => Cell::DateTime(parsed),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

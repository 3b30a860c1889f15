//! The transformation core.
//!
//! Validates the two input tables, joins them on (Job No, BE No), derives
//! the fiscal and address fields for every joined line item, and assembles
//! the output workbook plus the batch's log entries. Pure except for reading
//! the clock; all IO (upload parsing, log append, download) lives in the
//! HTTP layer.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Local;
use thiserror::Error;

use super::address;
use super::gstin::GstinTable;
use super::models::{EwayBillLine, GeneratedEwaybill};
use super::tabular::{lenient_number, Sheet};
use super::workbook;
use crate::processing_log::{LogEntry, TIMESTAMP_FORMAT};

/// Worksheet the register is read from.
pub const REGISTER_SHEET: &str = "Sheet1";

const REQUIRED_REGISTER_COLUMNS: [&str; 6] = [
    "Job No",
    "BE No",
    "BE Date",
    "Supplier/Exporter",
    "Importer",
    "Importer Address",
];

const REQUIRED_ITEM_COLUMNS: [&str; 11] = [
    "Job No",
    "Assessable Value (INR)",
    "SWS Duty Amt",
    "BCD Foregone",
    "Total Basic Duty (INR)",
    "IGST",
    "IGST Rate",
    "Product Desc",
    "CTH",
    "Quantity",
    "Unit",
];

const PRODUCT_NAME_LIMIT: usize = 100;

/// Terminal failures. Anything else (bad numbers, odd addresses, unknown
/// states) degrades per row instead of failing the batch.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{}", schema_message(.register, .items))]
    Schema {
        register: Vec<String>,
        items: Vec<String>,
    },
    #[error("Missing Job Numbers: {}", .0.join(", "))]
    Referential(Vec<String>),
    #[error("No rows in the Item Report matched the Import Job Register on Job No and BE No")]
    NoMatchingRows,
    #[error("could not assemble the output workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

fn schema_message(register: &[String], items: &[String]) -> String {
    let mut message = String::new();
    if !register.is_empty() {
        message.push_str(&format!(
            "Missing columns in Import Job Register: {}. ",
            register.join(", ")
        ));
    }
    if !items.is_empty() {
        message.push_str(&format!(
            "Missing columns in Item Report: {}.",
            items.join(", ")
        ));
    }
    message.trim_end().to_string()
}

/// Column indexes resolved once per batch.
struct RegisterColumns {
    job_no: usize,
    be_no: usize,
    be_date: usize,
    supplier: usize,
    importer: usize,
    importer_address: usize,
}

struct ItemColumns {
    job_no: usize,
    /// The join needs the item report's BE No; the register alone carrying
    /// it means an item file without one simply joins nothing.
    be_no: Option<usize>,
    assessable_value: usize,
    sws_duty: usize,
    bcd_foregone: usize,
    basic_duty: usize,
    igst: usize,
    igst_rate: usize,
    product_desc: usize,
    cth: usize,
    quantity: usize,
    unit: usize,
}

/// Turns the register and item report into a finished waybill workbook.
pub struct EwayBillTransformer<'a> {
    gstin: &'a GstinTable,
}

impl<'a> EwayBillTransformer<'a> {
    pub fn new(gstin: &'a GstinTable) -> Self {
        Self { gstin }
    }

    pub fn transform(
        &self,
        register: &Sheet,
        items: &Sheet,
        vehicle_no: &str,
        distance_km: f64,
    ) -> Result<GeneratedEwaybill, TransformError> {
        // Schema gate: every missing column reported at once, per source.
        let missing_register = register.missing_columns(&REQUIRED_REGISTER_COLUMNS);
        let missing_items = items.missing_columns(&REQUIRED_ITEM_COLUMNS);
        if !missing_register.is_empty() || !missing_items.is_empty() {
            return Err(TransformError::Schema {
                register: missing_register,
                items: missing_items,
            });
        }

        let reg_cols = RegisterColumns {
            job_no: register.column("Job No").unwrap(),
            be_no: register.column("BE No").unwrap(),
            be_date: register.column("BE Date").unwrap(),
            supplier: register.column("Supplier/Exporter").unwrap(),
            importer: register.column("Importer").unwrap(),
            importer_address: register.column("Importer Address").unwrap(),
        };
        let item_cols = ItemColumns {
            job_no: items.column("Job No").unwrap(),
            be_no: items.column("BE No"),
            assessable_value: items.column("Assessable Value (INR)").unwrap(),
            sws_duty: items.column("SWS Duty Amt").unwrap(),
            bcd_foregone: items.column("BCD Foregone").unwrap(),
            basic_duty: items.column("Total Basic Duty (INR)").unwrap(),
            igst: items.column("IGST").unwrap(),
            igst_rate: items.column("IGST Rate").unwrap(),
            product_desc: items.column("Product Desc").unwrap(),
            cth: items.column("CTH").unwrap(),
            quantity: items.column("Quantity").unwrap(),
            unit: items.column("Unit").unwrap(),
        };

        // Referential gate, on Job No alone, before any join work.
        let register_jobs: HashSet<String> = (0..register.rows().len())
            .map(|r| register.cell(r, reg_cols.job_no).as_text())
            .collect();
        let missing_jobs: BTreeSet<String> = (0..items.rows().len())
            .map(|r| items.cell(r, item_cols.job_no).as_text())
            .filter(|job| !register_jobs.contains(job))
            .collect();
        if !missing_jobs.is_empty() {
            return Err(TransformError::Referential(
                missing_jobs.into_iter().collect(),
            ));
        }

        // Inner join on (Job No, BE No), item-report row order preserved.
        // Item rows whose pair has no register match are dropped.
        let mut register_index: HashMap<(String, String), Vec<usize>> = HashMap::new();
        for r in 0..register.rows().len() {
            let key = (
                register.cell(r, reg_cols.job_no).as_text(),
                register.cell(r, reg_cols.be_no).as_text(),
            );
            register_index.entry(key).or_default().push(r);
        }

        let mut joined: Vec<(String, EwayBillLine)> = Vec::new();
        for i in 0..items.rows().len() {
            let job_no = items.cell(i, item_cols.job_no).as_text();
            let be_no = match item_cols.be_no {
                Some(col) => items.cell(i, col).as_text(),
                None => String::new(),
            };
            let Some(matches) = register_index.get(&(job_no.clone(), be_no.clone())) else {
                continue;
            };
            for &r in matches {
                let line = self.derive_line(
                    register, &reg_cols, r, items, &item_cols, i, &be_no, vehicle_no, distance_km,
                );
                joined.push((job_no.clone(), line));
            }
        }

        let first_be_no = match joined.first() {
            Some((_, line)) => line.document_no.clone(),
            None => return Err(TransformError::NoMatchingRows),
        };

        // One clock read per batch: filename stamp, transporter document
        // date, and every log entry share it.
        let now = Local::now();
        let filename = format!("EWB_{}_{}.xlsx", first_be_no, now.format("%Y%m%d_%H%M%S"));
        let transporter_doc_date = now.format("%d-%m-%Y").to_string();
        let batch_timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        let job_numbers = distinct_in_order(joined.iter().map(|(job, _)| job.clone()));
        let log_entries: Vec<LogEntry> = distinct_in_order(
            joined
                .iter()
                .map(|(job, line)| (job.clone(), line.document_no.clone())),
        )
        .into_iter()
        .map(|(job_no, be_no)| LogEntry {
            job_no,
            be_no,
            vehicle_no: vehicle_no.to_string(),
            processed_date: batch_timestamp.clone(),
        })
        .collect();

        let lines: Vec<EwayBillLine> = joined.into_iter().map(|(_, line)| line).collect();
        let workbook = workbook::build(&lines, &transporter_doc_date)?;

        Ok(GeneratedEwaybill {
            workbook,
            filename,
            job_numbers,
            log_entries,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn derive_line(
        &self,
        register: &Sheet,
        reg_cols: &RegisterColumns,
        reg_row: usize,
        items: &Sheet,
        item_cols: &ItemColumns,
        item_row: usize,
        be_no: &str,
        vehicle_no: &str,
        distance_km: f64,
    ) -> EwayBillLine {
        let assessable = lenient_number(items.cell(item_row, item_cols.assessable_value));
        let sws_duty = lenient_number(items.cell(item_row, item_cols.sws_duty));
        let bcd_foregone = lenient_number(items.cell(item_row, item_cols.bcd_foregone));
        let basic_duty = lenient_number(items.cell(item_row, item_cols.basic_duty));
        let igst_amount = lenient_number(items.cell(item_row, item_cols.igst));

        let taxable_value = assessable + sws_duty + bcd_foregone + basic_duty;
        let invoice_value = taxable_value + igst_amount;

        let raw_address = register
            .cell(reg_row, reg_cols.importer_address)
            .as_raw_text();
        let bill_to_state = address::state_segment(&raw_address).unwrap_or("");
        let bill_to_gstin = self.gstin.lookup(bill_to_state).to_string();

        let (ship_to_pin_code, clean_address) = address::extract_pin_code(&raw_address);
        let (ship_to_address, ship_to_place) = address::midpoint_split(&clean_address);

        let product_desc = items.cell(item_row, item_cols.product_desc).as_text();
        let product_name: String = product_desc.chars().take(PRODUCT_NAME_LIMIT).collect();

        EwayBillLine {
            document_no: be_no.to_string(),
            // BE Date: datetime cells render DD-MM-YYYY, text passes
            // through, empty stays empty.
            document_date: register.cell(reg_row, reg_cols.be_date).as_text(),
            supplier: register.cell(reg_row, reg_cols.supplier).as_text(),
            importer: register.cell(reg_row, reg_cols.importer).as_text(),
            bill_to_gstin,
            ship_to_address,
            ship_to_place,
            ship_to_pin_code,
            product_description: product_name.clone(),
            product_name,
            hsn: items.cell(item_row, item_cols.cth).as_text(),
            quantity: items.cell(item_row, item_cols.quantity).clone(),
            unit: items.cell(item_row, item_cols.unit).as_text(),
            taxable_value,
            igst_rate: items.cell(item_row, item_cols.igst_rate).clone(),
            igst_amount,
            invoice_value,
            distance_km,
            vehicle_no: vehicle_no.to_string(),
        }
    }
}

fn distinct_in_order<T: Clone + Eq + std::hash::Hash>(
    values: impl Iterator<Item = T>,
) -> Vec<T> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

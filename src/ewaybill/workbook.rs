//! E-Way Bill workbook assembly.
//!
//! Writes the finished waybill table to an in-memory XLSX buffer in the
//! column order the filing portal expects.

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use super::models::{self, EwayBillLine};
use super::tabular::{maybe_number, Cell};

/// Output columns, in portal order.
pub const COLUMNS: [&str; 41] = [
    "Sub-type",
    "Document Type",
    "Document No",
    "Document Date",
    "Bill from Company Name",
    "Bill from GSTIN ID",
    "Bill from State",
    "Despatch from Address",
    "Despatch from Place",
    "Despatch from PIN Code",
    "Bill to State Code",
    "Bill to Company Name",
    "Bill to GSTIN ID",
    "Bill to State",
    "Ship to Address",
    "Ship to Place",
    "Ship to PIN Code",
    "Ship to State",
    "Product Name",
    "Product Description",
    "HSN",
    "Quantity",
    "Unit",
    "Taxable Value",
    "CGST Rate",
    "SGST/UTGST Rate",
    "IGST Rate",
    "Cess Rate",
    "CGST Amount",
    "SGST Amount",
    "IGST Amount",
    "CESS Amount",
    "Total Invoice Value",
    "Transporter Name",
    "Transporter ID",
    "Approx Distance (km)",
    "Mode",
    "Vehicle Type",
    "Vehicle No",
    "Transporter Doc No",
    "Transporter Doc Date",
];

/// One cell of the output table.
enum Field {
    Text(String),
    Number(f64),
    /// Quantity and IGST Rate pass through: numbers stay numbers, anything
    /// else is written as text.
    PassThrough(Cell),
}

impl Field {
    fn text(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}

/// Build the workbook: one header row plus one row per line.
/// `transporter_doc_date` is the batch date, shared by every row.
pub fn build(lines: &[EwayBillLine], transporter_doc_date: &str) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (i, line) in lines.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, field) in line_fields(line, transporter_doc_date).into_iter().enumerate() {
            write_field(worksheet, row, col as u16, field)?;
        }
    }

    workbook.save_to_buffer()
}

fn line_fields(line: &EwayBillLine, transporter_doc_date: &str) -> Vec<Field> {
    let state_code = line.state_code();

    vec![
        Field::text(models::SUB_TYPE),
        Field::text(models::DOCUMENT_TYPE),
        Field::text(&line.document_no),
        Field::text(&line.document_date),
        Field::text(&line.supplier),
        Field::text(models::BILL_FROM_GSTIN),
        Field::text(models::BILL_FROM_STATE),
        Field::text(models::DESPATCH_FROM_ADDRESS),
        Field::text(models::DESPATCH_FROM_PLACE),
        Field::text(models::DESPATCH_FROM_PIN_CODE),
        Field::text(models::BILL_TO_STATE_CODE),
        Field::text(&line.importer),
        Field::text(&line.bill_to_gstin),
        Field::text(&state_code),
        Field::text(&line.ship_to_address),
        Field::text(&line.ship_to_place),
        Field::text(&line.ship_to_pin_code),
        Field::text(&state_code),
        Field::text(&line.product_name),
        Field::text(&line.product_description),
        Field::text(&line.hsn),
        Field::PassThrough(line.quantity.clone()),
        Field::text(&line.unit),
        Field::Number(line.taxable_value),
        Field::Number(0.0), // CGST Rate
        Field::Number(0.0), // SGST/UTGST Rate
        Field::PassThrough(line.igst_rate.clone()),
        Field::Number(0.0), // Cess Rate
        Field::Number(0.0), // CGST Amount
        Field::Number(0.0), // SGST Amount
        Field::Number(line.igst_amount),
        Field::Number(0.0), // CESS Amount
        Field::Number(line.invoice_value),
        Field::text(models::TRANSPORTER_NAME),
        Field::text(models::TRANSPORTER_ID),
        Field::Number(line.distance_km),
        Field::text(models::TRANSPORT_MODE),
        Field::text(models::VEHICLE_TYPE),
        Field::text(&line.vehicle_no),
        Field::text(models::TRANSPORTER_DOC_NO),
        Field::text(transporter_doc_date),
    ]
}

fn write_field(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    field: Field,
) -> Result<(), XlsxError> {
    match field {
        Field::Text(value) => worksheet.write_string(row, col, value)?,
        Field::Number(value) => worksheet.write_number(row, col, value)?,
        Field::PassThrough(cell) => match maybe_number(&cell) {
            Some(n) => worksheet.write_number(row, col, n)?,
            None => worksheet.write_string(row, col, cell.as_text())?,
        },
    };
    Ok(())
}

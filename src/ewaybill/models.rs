//! Data carried by one generated E-Way Bill.

use crate::ewaybill::tabular::Cell;
use crate::processing_log::LogEntry;

// Shipment constants fixed by the company's dispatch setup. Imports clear
// through the Sahar air cargo complex and move onward by road under the
// company's own transporter registration.
pub const SUB_TYPE: &str = "Import";
pub const DOCUMENT_TYPE: &str = "Bill of Entry";
pub const BILL_FROM_GSTIN: &str = "URP";
pub const BILL_FROM_STATE: &str = "99";
pub const DESPATCH_FROM_ADDRESS: &str = "AIR CARGO COMPLEX";
pub const DESPATCH_FROM_PLACE: &str = "SAHAR ANDHERI EAST";
pub const DESPATCH_FROM_PIN_CODE: &str = "400099";
pub const BILL_TO_STATE_CODE: &str = "27";
pub const TRANSPORTER_NAME: &str = "Geeta Freight Forwarders Pvt Ltd";
pub const TRANSPORTER_ID: &str = "27AAACG8785D1ZE";
pub const TRANSPORT_MODE: &str = "Road";
pub const VEHICLE_TYPE: &str = "Regular";
pub const TRANSPORTER_DOC_NO: &str = "LR";

/// One output row of the waybill spreadsheet.
///
/// Only the varying fields live here; the fixed shipment columns above are
/// written directly during workbook assembly. CGST/SGST/Cess rates and
/// amounts are always zero for imports (IGST only) and are likewise written
/// as constants.
#[derive(Debug, Clone)]
pub struct EwayBillLine {
    pub document_no: String,
    pub document_date: String,
    pub supplier: String,
    pub importer: String,
    pub bill_to_gstin: String,
    pub ship_to_address: String,
    pub ship_to_place: String,
    pub ship_to_pin_code: String,
    pub product_name: String,
    pub product_description: String,
    pub hsn: String,
    pub quantity: Cell,
    pub unit: String,
    pub taxable_value: f64,
    pub igst_rate: Cell,
    pub igst_amount: f64,
    pub invoice_value: f64,
    pub distance_km: f64,
    pub vehicle_no: String,
}

impl EwayBillLine {
    /// First two characters of the bill-to GSTIN; empty GSTIN → empty code.
    pub fn state_code(&self) -> String {
        self.bill_to_gstin.chars().take(2).collect()
    }
}

/// The result of one successful transformation batch.
#[derive(Debug)]
pub struct GeneratedEwaybill {
    /// Finished XLSX workbook.
    pub workbook: Vec<u8>,
    /// `EWB_{BE No}_{YYYYMMDD_HHMMSS}.xlsx`, BE number taken from the first
    /// joined row.
    pub filename: String,
    /// Distinct job numbers in order of first appearance, for confirmation
    /// display.
    pub job_numbers: Vec<String>,
    /// One entry per distinct (Job No, BE No) pair, sharing one batch
    /// timestamp.
    pub log_entries: Vec<LogEntry>,
}

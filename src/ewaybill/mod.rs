//! E-Way Bill generation.
//!
//! The transformation core ([`transform::EwayBillTransformer`]) is pure:
//! two normalized tables in, a finished workbook plus log entries out. The
//! handler module is the only place it touches HTTP.

pub mod address;
pub mod gstin;
pub mod handlers;
pub mod models;
pub mod multipart;
pub mod tabular;
pub mod transform;
pub mod workbook;

pub use gstin::GstinTable;
pub use models::{EwayBillLine, GeneratedEwaybill};
pub use transform::{EwayBillTransformer, TransformError};

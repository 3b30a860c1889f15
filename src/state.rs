//! Shared application state.

use parking_lot::Mutex;

use crate::config::AppConfig;
use crate::ewaybill::GstinTable;
use crate::processing_log::CsvLogStore;

/// State shared across workers.
///
/// The GSTIN table and credential are immutable after startup; the log
/// store sits behind a mutex so appends from concurrent requests serialize
/// within this process (the store itself offers no cross-process guarantee).
pub struct AppState {
    pub gstin: GstinTable,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub log_store: Mutex<CsvLogStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, bcrypt::BcryptError> {
        let admin_password_hash = bcrypt::hash(&config.admin_password, bcrypt::DEFAULT_COST)?;
        Ok(Self {
            gstin: GstinTable::builtin(),
            admin_username: config.admin_username,
            admin_password_hash,
            log_store: Mutex::new(CsvLogStore::new(config.log_path)),
        })
    }
}

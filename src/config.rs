//! Environment-driven configuration, loaded once at startup.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_ADMIN_USERNAME: &str = "Admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Geeta@2025";
const DEFAULT_LOG_PATH: &str = "Ewaybill_Processing_Log.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The single operator account.
    pub admin_username: String,
    pub admin_password: String,
    /// Where the append-only processing log lives.
    pub log_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let admin_username =
            env::var("EWB_ADMIN_USERNAME").unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string());
        let admin_password = env::var("EWB_ADMIN_PASSWORD").unwrap_or_else(|_| {
            log::warn!(
                "EWB_ADMIN_PASSWORD not set, using the default credential. SET THIS IN PRODUCTION!"
            );
            DEFAULT_ADMIN_PASSWORD.to_string()
        });
        let log_path = env::var("EWB_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_PATH));

        Self {
            admin_username,
            admin_password,
            log_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_operator_account() {
        let config = AppConfig {
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            log_path: PathBuf::from("Ewaybill_Processing_Log.csv"),
        };
        assert_eq!(config.admin_username, "Admin");
        assert_eq!(config.log_path.file_name().unwrap(), "Ewaybill_Processing_Log.csv");
    }
}

use std::env;

use crate::constants::DEFAULT_CONFIG_FILE_PATH;

/// Settings taken from the process environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Path of the JSON signer config file.
    pub config_file_path: String,
    /// Signer to use when the config file holds several.
    pub signer_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            config_file_path: env::var("CONFIG_FILE_PATH")
                .unwrap_or_else(|_| DEFAULT_CONFIG_FILE_PATH.to_string()),
            signer_id: env::var("SIGNER_ID").ok().filter(|id| !id.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var("CONFIG_FILE_PATH");
        env::remove_var("SIGNER_ID");

        let config = AppConfig::from_env();
        assert_eq!(config.config_file_path, "config/config.json");
        assert_eq!(config.signer_id, None);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("CONFIG_FILE_PATH", "/etc/signer/config.json");
        env::set_var("SIGNER_ID", "kms-signer");

        let config = AppConfig::from_env();
        assert_eq!(config.config_file_path, "/etc/signer/config.json");
        assert_eq!(config.signer_id.as_deref(), Some("kms-signer"));

        env::remove_var("CONFIG_FILE_PATH");
        env::remove_var("SIGNER_ID");
    }

    #[test]
    #[serial]
    fn test_from_env_empty_signer_id() {
        env::set_var("SIGNER_ID", "");
        assert_eq!(AppConfig::from_env().signer_id, None);
        env::remove_var("SIGNER_ID");
    }
}

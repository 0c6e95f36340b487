/// Default location of the signer configuration file
pub const DEFAULT_CONFIG_FILE_PATH: &str = "config/config.json";

/// Maximum length of a signer id
pub const MAX_SIGNER_ID_LENGTH: usize = 36;

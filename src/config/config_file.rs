use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};
use thiserror::Error;

mod signer;
pub use signer::*;

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("Invalid ID length: {0}")]
    InvalidIdLength(String),
    #[error("Invalid ID format: {0}")]
    InvalidIdFormat(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Missing env var: {0}")]
    MissingEnvVar(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Duplicate id error: {0}")]
    DuplicateId(String),
    #[error("Signer not found: {0}")]
    SignerNotFound(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SignersFileConfig {
    pub signers: Vec<SignerFileConfig>,
}

impl SignersFileConfig {
    pub fn new(signers: Vec<SignerFileConfig>) -> Self {
        Self { signers }
    }

    pub fn validate(&self) -> Result<(), ConfigFileError> {
        if self.signers.is_empty() {
            return Err(ConfigFileError::MissingField("signers".into()));
        }

        let mut ids = HashSet::new();
        for signer in &self.signers {
            signer.validate_signer()?;
            if !ids.insert(signer.id.as_str()) {
                return Err(ConfigFileError::DuplicateId(signer.id.clone()));
            }
        }
        Ok(())
    }

    /// Picks the signer with `id`, or the only configured signer when
    /// `id` is `None`.
    pub fn select(&self, id: Option<&str>) -> Result<&SignerFileConfig, ConfigFileError> {
        match id {
            Some(id) => self
                .signers
                .iter()
                .find(|signer| signer.id == id)
                .ok_or_else(|| ConfigFileError::SignerNotFound(id.to_string())),
            None => match self.signers.as_slice() {
                [signer] => Ok(signer),
                _ => Err(ConfigFileError::MissingField(
                    "signer id (config holds more than one signer)".into(),
                )),
            },
        }
    }
}

/// Reads, parses and validates the signer config file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<SignersFileConfig, ConfigFileError> {
    let config_str = fs::read_to_string(path)?;
    let config: SignersFileConfig = serde_json::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

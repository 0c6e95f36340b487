//! Signer entries of the config file.
//!
//! ```json
//! {
//!   "id": "kms-signer",
//!   "type": "aws_kms",
//!   "config": {
//!     "key_id": { "type": "env", "name": "AWS_KMS_KEY_ID" },
//!     "region": "us-east-1"
//!   }
//! }
//! ```
//!
//! `key_id` may also be given as a plain string.

use serde::{Deserialize, Deserializer, Serialize};

use super::ConfigFileError;
use crate::{constants::MAX_SIGNER_ID_LENGTH, models::AwsKmsSignerConfig};

/// A config value given inline or as a reference to an environment variable.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlainOrEnvConfigValue {
    Env { name: String },
    Plain { value: String },
}

impl PlainOrEnvConfigValue {
    pub fn get_value(&self) -> Result<String, ConfigFileError> {
        match self {
            PlainOrEnvConfigValue::Env { name } => std::env::var(name).map_err(|_| {
                ConfigFileError::MissingEnvVar(format!("Environment variable {} not found", name))
            }),
            PlainOrEnvConfigValue::Plain { value } => Ok(value.clone()),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            PlainOrEnvConfigValue::Env { name } => name.trim().is_empty(),
            PlainOrEnvConfigValue::Plain { value } => value.trim().is_empty(),
        }
    }
}

// Accepts a bare string as shorthand for `{"type": "plain", "value": ...}`.
impl<'de> Deserialize<'de> for PlainOrEnvConfigValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(tag = "type", rename_all = "lowercase")]
        enum Tagged {
            Env { name: String },
            Plain { value: String },
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            String(String),
            Tagged(Tagged),
        }

        Ok(match Helper::deserialize(deserializer)? {
            Helper::String(value) => PlainOrEnvConfigValue::Plain { value },
            Helper::Tagged(Tagged::Env { name }) => PlainOrEnvConfigValue::Env { name },
            Helper::Tagged(Tagged::Plain { value }) => PlainOrEnvConfigValue::Plain { value },
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AwsKmsSignerFileConfig {
    pub key_id: PlainOrEnvConfigValue,
    #[serde(default)]
    pub region: Option<String>,
}

impl AwsKmsSignerFileConfig {
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        if self.key_id.is_empty() {
            return Err(ConfigFileError::MissingField("key_id".into()));
        }
        if matches!(&self.region, Some(region) if region.trim().is_empty()) {
            return Err(ConfigFileError::MissingField("region".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase", content = "config")]
pub enum SignerConfig {
    #[serde(rename = "aws_kms")]
    AwsKms(AwsKmsSignerFileConfig),
}

impl SignerConfig {
    pub fn get_aws_kms(&self) -> &AwsKmsSignerFileConfig {
        match self {
            SignerConfig::AwsKms(aws_kms) => aws_kms,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SignerFileConfig {
    pub id: String,
    #[serde(flatten)]
    pub config: SignerConfig,
}

impl SignerFileConfig {
    pub fn validate_signer(&self) -> Result<(), ConfigFileError> {
        if self.id.is_empty() {
            return Err(ConfigFileError::InvalidIdLength(
                "Signer ID cannot be empty".into(),
            ));
        }
        if self.id.len() > MAX_SIGNER_ID_LENGTH {
            return Err(ConfigFileError::InvalidIdLength(format!(
                "Signer ID length must not exceed {} characters",
                MAX_SIGNER_ID_LENGTH
            )));
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigFileError::InvalidIdFormat(
                "ID must contain only letters, numbers, dashes and underscores".into(),
            ));
        }

        match &self.config {
            SignerConfig::AwsKms(aws_kms_config) => aws_kms_config.validate(),
        }
    }

    /// Resolves the AWS KMS settings, reading env-backed values.
    pub fn aws_kms_config(&self) -> Result<AwsKmsSignerConfig, ConfigFileError> {
        let config = self.config.get_aws_kms();

        let key_id = config.key_id.get_value()?;
        if key_id.trim().is_empty() {
            return Err(ConfigFileError::MissingField("key_id".into()));
        }

        Ok(AwsKmsSignerConfig {
            key_id,
            region: config.region.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_valid_signer_config_plain_string() {
        let config = json!({
            "id": "kms-signer",
            "type": "aws_kms",
            "config": {
                "key_id": "alias/evm-signer",
                "region": "eu-west-1"
            }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        assert!(signer_config.validate_signer().is_ok());
        assert_eq!(
            signer_config.aws_kms_config().unwrap(),
            AwsKmsSignerConfig {
                key_id: "alias/evm-signer".to_string(),
                region: Some("eu-west-1".to_string()),
            }
        );
    }

    #[test]
    fn test_get_aws_kms_returns_file_config() {
        let signer_config: SignerFileConfig = serde_json::from_value(json!({
            "id": "kms-signer",
            "type": "aws_kms",
            "config": { "key_id": "alias/evm-signer" }
        }))
        .unwrap();

        let aws_kms = signer_config.config.get_aws_kms();
        assert_eq!(aws_kms.region, None);
        assert_eq!(aws_kms.key_id.get_value().unwrap(), "alias/evm-signer");
    }

    #[test]
    fn test_valid_signer_config_tagged_plain() {
        let config = json!({
            "id": "kms-signer",
            "type": "aws_kms",
            "config": {
                "key_id": { "type": "plain", "value": "alias/evm-signer" }
            }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        let resolved = signer_config.aws_kms_config().unwrap();
        assert_eq!(resolved.key_id, "alias/evm-signer");
        assert_eq!(resolved.region, None);
    }

    #[test]
    #[serial]
    fn test_valid_signer_config_env() {
        env::set_var("TEST_AWS_KMS_KEY_ID", "alias/from-env");

        let config = json!({
            "id": "kms-signer",
            "type": "aws_kms",
            "config": {
                "key_id": { "type": "env", "name": "TEST_AWS_KMS_KEY_ID" }
            }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        assert!(signer_config.validate_signer().is_ok());
        assert_eq!(
            signer_config.aws_kms_config().unwrap().key_id,
            "alias/from-env"
        );
        env::remove_var("TEST_AWS_KMS_KEY_ID");
    }

    #[test]
    #[serial]
    fn test_missing_env_var() {
        env::remove_var("TEST_AWS_KMS_MISSING_KEY_ID");

        let config = json!({
            "id": "kms-signer",
            "type": "aws_kms",
            "config": {
                "key_id": { "type": "env", "name": "TEST_AWS_KMS_MISSING_KEY_ID" }
            }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        assert!(matches!(
            signer_config.aws_kms_config(),
            Err(ConfigFileError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_empty_signer_id() {
        let config = json!({
            "id": "",
            "type": "aws_kms",
            "config": { "key_id": "alias/evm-signer" }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        assert!(matches!(
            signer_config.validate_signer(),
            Err(ConfigFileError::InvalidIdLength(_))
        ));
    }

    #[test]
    fn test_signer_id_too_long() {
        let config = json!({
            "id": "a".repeat(MAX_SIGNER_ID_LENGTH + 1),
            "type": "aws_kms",
            "config": { "key_id": "alias/evm-signer" }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        assert!(matches!(
            signer_config.validate_signer(),
            Err(ConfigFileError::InvalidIdLength(_))
        ));
    }

    #[test]
    fn test_invalid_signer_id_format() {
        let config = json!({
            "id": "kms signer!",
            "type": "aws_kms",
            "config": { "key_id": "alias/evm-signer" }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        assert!(matches!(
            signer_config.validate_signer(),
            Err(ConfigFileError::InvalidIdFormat(_))
        ));
    }

    #[test]
    fn test_empty_key_id() {
        let config = json!({
            "id": "kms-signer",
            "type": "aws_kms",
            "config": { "key_id": "  " }
        });

        let signer_config: SignerFileConfig = serde_json::from_value(config).unwrap();
        assert!(matches!(
            signer_config.validate_signer(),
            Err(ConfigFileError::MissingField(_))
        ));
    }

    #[test]
    fn test_unknown_signer_type() {
        let config = json!({
            "id": "local-signer",
            "type": "local",
            "config": { "path": "keys/local.json" }
        });

        assert!(serde_json::from_value::<SignerFileConfig>(config).is_err());
    }

    #[test]
    fn test_unknown_aws_kms_field() {
        let config = json!({
            "id": "kms-signer",
            "type": "aws_kms",
            "config": { "key_id": "alias/evm-signer", "profile": "default" }
        });

        assert!(serde_json::from_value::<SignerFileConfig>(config).is_err());
    }
}

//! Signer models
use serde::{Deserialize, Serialize};

/// AWS KMS key reference. When `region` is unset the default AWS
/// provider chain decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsKmsSignerConfig {
    pub region: Option<String>,
    pub key_id: String,
}

use serde::Serialize;
use thiserror::Error;

use crate::{
    services::AwsKmsError,
    utils::{AddressDerivationError, DerError, Secp256k1Error},
};

#[derive(Error, Debug, Serialize)]
pub enum SignerError {
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Recovery mismatch: {0}")]
    RecoveryMismatch(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Failed to compute digest: {0}")]
    DigestError(String),

    #[error("KMS error: {0}")]
    Kms(#[from] AwsKmsError),
}

impl From<DerError> for SignerError {
    fn from(error: DerError) -> Self {
        SignerError::MalformedEncoding(error.to_string())
    }
}

impl From<AddressDerivationError> for SignerError {
    fn from(error: AddressDerivationError) -> Self {
        SignerError::MalformedEncoding(error.to_string())
    }
}

impl From<Secp256k1Error> for SignerError {
    fn from(error: Secp256k1Error) -> Self {
        match error {
            Secp256k1Error::RecoveryMismatch(msg) => SignerError::RecoveryMismatch(msg),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum SignerFactoryError {
    #[error("Invalid signer config: {0}")]
    InvalidConfig(String),

    #[error("Signer creation failed: {0}")]
    CreationFailed(String),
}

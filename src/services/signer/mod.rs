//! # Signer Module
//!
//! The [`Signer`] capability and the factory that builds signers from the
//! config file.

use alloy::{
    dyn_abi::TypedData,
    primitives::{Address, B256},
};
use async_trait::async_trait;

use crate::{
    config::SignerFileConfig,
    models::{
        EvmTransactionRequest, RecoverableSignature, SignedTransaction, SignerError,
        SignerFactoryError,
    },
    services::AwsKmsService,
};

pub mod evm;
pub use evm::*;

#[async_trait]
pub trait Signer: Send + Sync {
    /// Returns the signer's EVM address.
    async fn address(&self) -> Result<Address, SignerError>;

    /// Signs a 32-byte digest as is.
    async fn sign_digest(&self, digest: B256) -> Result<RecoverableSignature, SignerError>;

    /// Signs an EIP-191 personal message.
    async fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, SignerError>;

    /// Signs EIP-712 typed data.
    async fn sign_typed_data(
        &self,
        typed_data: &TypedData,
    ) -> Result<RecoverableSignature, SignerError>;

    /// Signs a legacy or EIP-1559 transaction and returns its EIP-2718 encoding.
    async fn sign_transaction(
        &self,
        request: &EvmTransactionRequest,
    ) -> Result<SignedTransaction, SignerError>;

    /// Address that produced `signature` over the EIP-191 hash of `message`.
    fn recover_message_signer(
        &self,
        message: &[u8],
        signature: &str,
    ) -> Result<Address, SignerError> {
        evm::recover_message_signer(message, signature)
    }

    /// Address that signed the transaction `signed_tx` built from `request`.
    fn recover_transaction_signer(
        &self,
        request: &EvmTransactionRequest,
        signed_tx: &str,
    ) -> Result<Address, SignerError> {
        evm::recover_transaction_signer(request, signed_tx)
    }
}

pub struct SignerFactory;

impl SignerFactory {
    pub async fn create_evm_signer(
        signer_config: &SignerFileConfig,
    ) -> Result<AwsKmsSigner, SignerFactoryError> {
        signer_config
            .validate_signer()
            .map_err(|e| SignerFactoryError::InvalidConfig(e.to_string()))?;
        let config = signer_config
            .aws_kms_config()
            .map_err(|e| SignerFactoryError::InvalidConfig(e.to_string()))?;

        let aws_service = AwsKmsService::new(config).await.map_err(|e| {
            SignerFactoryError::CreationFailed(format!("AWS KMS service error: {}", e))
        })?;

        Ok(AwsKmsSigner::new(aws_service))
    }
}

//! # AWS KMS Signer
//!
//! EVM signer backed by a secp256k1 key held in AWS KMS.
//!
//! KMS only ever sees 32-byte digests. Everything else happens locally:
//!
//! ```text
//! payload ──► digest ──► KMS Sign ──► DER (r, s) ──► low-s ──► v ∈ {27, 28}
//!                                                              (matched against
//!                                                               the cached address)
//! ```
//!
//! The address is derived from the key's DER public key on first use and
//! then kept for the lifetime of the signer.

use alloy::{
    dyn_abi::TypedData,
    eips::eip2718::Encodable2718,
    primitives::{eip191_hash_message, Address, B256},
};
use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::OnceCell;

use super::utils::assemble_evm_signature;
use crate::{
    models::{
        EvmTransactionRequest, RecoverableSignature, SignedTransaction, SignerError,
        UnsignedEvmTransaction,
    },
    services::{AwsKmsEvmService, AwsKmsService, Signer},
    utils::{derive_ethereum_address_from_der, to_checksum_address},
};

pub struct AwsKmsSigner<S: AwsKmsEvmService = AwsKmsService> {
    aws_kms_service: S,
    address: OnceCell<Address>,
}

impl<S: AwsKmsEvmService> AwsKmsSigner<S> {
    pub fn new(aws_kms_service: S) -> Self {
        Self {
            aws_kms_service,
            address: OnceCell::new(),
        }
    }

    pub fn key_id(&self) -> &str {
        self.aws_kms_service.key_id()
    }

    async fn cached_address(&self) -> Result<Address, SignerError> {
        if let Some(address) = self.address.get() {
            return Ok(*address);
        }

        let der = self.aws_kms_service.get_der_public_key().await?;
        let address = derive_ethereum_address_from_der(&der)?;

        // A concurrent first call may have stored the same address already.
        let address = *self.address.get_or_init(|| address);
        info!(
            "Resolved address {} for AWS KMS key {}",
            to_checksum_address(&address),
            self.key_id()
        );

        Ok(address)
    }
}

#[async_trait]
impl<S: AwsKmsEvmService> Signer for AwsKmsSigner<S> {
    async fn address(&self) -> Result<Address, SignerError> {
        self.cached_address().await
    }

    async fn sign_digest(&self, digest: B256) -> Result<RecoverableSignature, SignerError> {
        let address = self.cached_address().await?;

        debug!("Signing digest {} with AWS KMS key {}", digest, self.key_id());
        let der_signature = self.aws_kms_service.sign_digest(digest).await?;

        assemble_evm_signature(&der_signature, &digest, &address)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, SignerError> {
        self.sign_digest(eip191_hash_message(message)).await
    }

    async fn sign_typed_data(
        &self,
        typed_data: &TypedData,
    ) -> Result<RecoverableSignature, SignerError> {
        let digest = typed_data
            .eip712_signing_hash()
            .map_err(|e| SignerError::DigestError(e.to_string()))?;
        self.sign_digest(digest).await
    }

    async fn sign_transaction(
        &self,
        request: &EvmTransactionRequest,
    ) -> Result<SignedTransaction, SignerError> {
        let unsigned_tx = UnsignedEvmTransaction::try_from(request)?;
        let signature = self.sign_digest(unsigned_tx.signature_hash()).await?;

        let envelope = unsigned_tx.into_envelope(signature.into());

        Ok(SignedTransaction {
            hash: *envelope.tx_hash(),
            signature,
            raw: envelope.encoded_2718(),
        })
    }
}

//! # AWS KMS Service Module
//!
//! Integration with AWS KMS for secp256k1 keys: public key retrieval and
//! digest signing.
//!
//! ## Architecture
//!
//! ```text
//! AwsKmsService (implements AwsKmsEvmService, bound to one key id)
//!   ├── Public Key Retrieval (via AwsKmsK256)
//!   └── Digest Signing (via AwsKmsK256)
//! ```
//! is based on
//! ```text
//! AwsKmsClient (implements AwsKmsK256)
//!   ├── Authentication (via the default AWS credential chain)
//!   ├── Public Key Retrieval in DER Encoding
//!   └── ECDSA_SHA_256 signing of 32-byte digests
//! ```
//! `AwsKmsK256` is mocked with `mockall` for unit testing and injected
//! into `AwsKmsService`. Both layers return the raw DER payloads; decoding
//! and recovery happen in the signer.

use alloy::primitives::B256;
use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region};
use aws_sdk_kms::{
    primitives::Blob,
    types::{MessageType, SigningAlgorithmSpec},
    Client,
};
use log::debug;
use serde::Serialize;

use crate::models::AwsKmsSignerConfig;

#[cfg(test)]
use mockall::{automock, mock};

#[derive(Clone, Debug, thiserror::Error, Serialize)]
pub enum AwsKmsError {
    #[error("AWS KMS response parse error: {0}")]
    ParseError(String),
    #[error("AWS KMS config error: {0}")]
    ConfigError(String),
    #[error("AWS KMS get error: {0}")]
    GetError(String),
    #[error("AWS KMS signing error: {0}")]
    SignError(String),
    #[error("AWS KMS permissions error: {0}")]
    PermissionError(String),
}

pub type AwsKmsResult<T> = Result<T, AwsKmsError>;

/// Key-scoped KMS operations consumed by the EVM signer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AwsKmsEvmService: Send + Sync {
    /// Identifier of the KMS key this service is bound to.
    fn key_id(&self) -> &str;
    /// Fetches the DER `SubjectPublicKeyInfo` of the configured key.
    async fn get_der_public_key(&self) -> AwsKmsResult<Vec<u8>>;
    /// Signs a pre-computed 32-byte digest. KMS does not hash it again.
    /// Returns the DER-encoded ECDSA signature.
    async fn sign_digest(&self, digest: B256) -> AwsKmsResult<Vec<u8>>;
}

#[async_trait]
pub trait AwsKmsK256: Send + Sync {
    /// Fetches the DER-encoded public key from AWS KMS.
    async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>>;
    /// Signs a digest using EcdsaSha256 spec. Returns DER-encoded signature
    async fn sign_digest<'a, 'b>(
        &'a self,
        key_id: &'b str,
        digest: [u8; 32],
    ) -> AwsKmsResult<Vec<u8>>;
}

#[cfg(test)]
mock! {
    pub AwsKmsClient { }

    #[async_trait]
    impl AwsKmsK256 for AwsKmsClient {
        async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>>;
        async fn sign_digest<'a, 'b>(
            &'a self,
            key_id: &'b str,
            digest: [u8; 32],
        ) -> AwsKmsResult<Vec<u8>>;
    }
}

#[derive(Debug, Clone)]
pub struct AwsKmsClient {
    inner: Client,
}

#[async_trait]
impl AwsKmsK256 for AwsKmsClient {
    async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>> {
        debug!("Fetching public key from AWS KMS, key_id: {}", key_id);

        let get_output = self
            .inner
            .get_public_key()
            .key_id(key_id)
            .send()
            .await
            .map_err(|e| {
                AwsKmsError::GetError(format!(
                    "Failed to get secp256k1 public key for key '{key_id}': {e:?}"
                ))
            })?;

        let der_pk_blob = get_output
            .public_key
            .ok_or(AwsKmsError::GetError(
                "No public key blob found".to_string(),
            ))?
            .into_inner();

        Ok(der_pk_blob)
    }

    async fn sign_digest<'a, 'b>(
        &'a self,
        key_id: &'b str,
        digest: [u8; 32],
    ) -> AwsKmsResult<Vec<u8>> {
        debug!("Signing digest with AWS KMS, key_id: {}", key_id);

        let sign_result = self
            .inner
            .sign()
            .key_id(key_id)
            .signing_algorithm(SigningAlgorithmSpec::EcdsaSha256)
            .message_type(MessageType::Digest)
            .message(Blob::new(digest))
            .send()
            .await;

        let der_signature = sign_result
            .map_err(|e| AwsKmsError::PermissionError(e.to_string()))?
            .signature
            .ok_or(AwsKmsError::SignError(
                "Signature not found in response".to_string(),
            ))?
            .into_inner();

        Ok(der_signature)
    }
}

#[derive(Debug, Clone)]
pub struct AwsKmsService<T: AwsKmsK256 = AwsKmsClient> {
    pub kms_key_id: String,
    client: T,
}

impl AwsKmsService<AwsKmsClient> {
    /// Builds a client for `config.key_id`. The region is taken from the
    /// config when present, otherwise from the default provider chain.
    pub async fn new(config: AwsKmsSignerConfig) -> AwsKmsResult<Self> {
        if config.key_id.trim().is_empty() {
            return Err(AwsKmsError::ConfigError(
                "KMS key id must not be empty".to_string(),
            ));
        }

        let region_provider =
            RegionProviderChain::first_try(config.region.map(Region::new)).or_default_provider();

        let auth_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        let client = AwsKmsClient {
            inner: Client::new(&auth_config),
        };

        Ok(Self {
            kms_key_id: config.key_id,
            client,
        })
    }
}

impl<T: AwsKmsK256> AwsKmsService<T> {
    /// Binds an existing KMS backend to the configured key.
    pub fn with_client(client: T, config: AwsKmsSignerConfig) -> Self {
        Self {
            client,
            kms_key_id: config.key_id,
        }
    }
}

#[async_trait]
impl<T: AwsKmsK256> AwsKmsEvmService for AwsKmsService<T> {
    fn key_id(&self) -> &str {
        &self.kms_key_id
    }

    async fn get_der_public_key(&self) -> AwsKmsResult<Vec<u8>> {
        self.client.get_der_public_key(&self.kms_key_id).await
    }

    async fn sign_digest(&self, digest: B256) -> AwsKmsResult<Vec<u8>> {
        self.client.sign_digest(&self.kms_key_id, digest.0).await
    }
}

//! Drives the public signing API against an in-process KMS that holds
//! real secp256k1 keys.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use alloy::{
    consensus::TxEnvelope,
    dyn_abi::TypedData,
    eips::eip2718::Decodable2718,
    primitives::{eip191_hash_message, Address, B256, U256},
};
use async_trait::async_trait;
use k256::{ecdsa::SigningKey, elliptic_curve::rand_core::OsRng, pkcs8::EncodePublicKey};
use serde_json::json;

use evm_kms_signer::{
    constants::SECP256K1_HALF_N,
    models::{AwsKmsSignerConfig, EvmTransactionRequest, SignerError},
    services::{
        AwsKmsError, AwsKmsK256, AwsKmsResult, AwsKmsService, AwsKmsSigner, Signer,
    },
    utils::{derive_ethereum_address_from_der, to_checksum_address},
};

/// KMS stand-in keeping one signing key per key id.
#[derive(Clone, Default)]
struct InMemoryKms {
    keys: Arc<HashMap<String, SigningKey>>,
    public_key_calls: Arc<AtomicUsize>,
    sign_calls: Arc<AtomicUsize>,
}

impl InMemoryKms {
    fn with_key(key_id: &str) -> (Self, Address) {
        let key = SigningKey::random(&mut OsRng);
        let der = key.verifying_key().to_public_key_der().unwrap();
        let address = derive_ethereum_address_from_der(der.as_bytes()).unwrap();

        let mut keys = HashMap::new();
        keys.insert(key_id.to_string(), key);
        (
            Self {
                keys: Arc::new(keys),
                ..Default::default()
            },
            address,
        )
    }

    fn key(&self, key_id: &str) -> AwsKmsResult<&SigningKey> {
        self.keys
            .get(key_id)
            .ok_or_else(|| AwsKmsError::GetError(format!("Key '{key_id}' does not exist")))
    }
}

#[async_trait]
impl AwsKmsK256 for InMemoryKms {
    async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>> {
        self.public_key_calls.fetch_add(1, Ordering::SeqCst);
        let der = self
            .key(key_id)?
            .verifying_key()
            .to_public_key_der()
            .map_err(|e| AwsKmsError::ParseError(e.to_string()))?;
        Ok(der.as_bytes().to_vec())
    }

    async fn sign_digest<'a, 'b>(
        &'a self,
        key_id: &'b str,
        digest: [u8; 32],
    ) -> AwsKmsResult<Vec<u8>> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        let (signature, _) = self
            .key(key_id)?
            .sign_prehash_recoverable(&digest)
            .map_err(|e| AwsKmsError::SignError(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

fn signer_for(kms: InMemoryKms, key_id: &str) -> AwsKmsSigner<AwsKmsService<InMemoryKms>> {
    AwsKmsSigner::new(AwsKmsService::with_client(
        kms,
        AwsKmsSignerConfig {
            key_id: key_id.to_string(),
            region: None,
        },
    ))
}

#[tokio::test]
async fn address_is_derived_once_per_signer() {
    let (kms, expected) = InMemoryKms::with_key("evm-key");
    let calls = kms.public_key_calls.clone();
    let signer = signer_for(kms, "evm-key");

    for _ in 0..3 {
        assert_eq!(signer.address().await.unwrap(), expected);
    }
    signer.sign_message(b"hello").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_first_use_agrees_on_address() {
    let (kms, expected) = InMemoryKms::with_key("evm-key");
    let signer = Arc::new(signer_for(kms, "evm-key"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let signer = signer.clone();
            tokio::spawn(async move { signer.address().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), expected);
    }
}

#[tokio::test]
async fn signed_message_recovers_to_signer() {
    let (kms, expected) = InMemoryKms::with_key("evm-key");
    let signer = signer_for(kms, "evm-key");

    let signature = signer.sign_message(b"Hello World").await.unwrap();

    assert!(signature.v == 27 || signature.v == 28);
    assert!(signature.s <= SECP256K1_HALF_N);
    assert!(signature.s > U256::ZERO);

    let recovered = signer
        .recover_message_signer(b"Hello World", &signature.to_string())
        .unwrap();
    assert_eq!(recovered, expected);
    assert_eq!(
        to_checksum_address(&recovered),
        to_checksum_address(&expected)
    );
}

#[tokio::test]
async fn sign_digest_matches_eip191_message_signature() {
    let (kms, _) = InMemoryKms::with_key("evm-key");
    let signer = signer_for(kms, "evm-key");

    // k256 signing is deterministic (RFC 6979)
    let via_message = signer.sign_message(b"same payload").await.unwrap();
    let via_digest = signer
        .sign_digest(eip191_hash_message(b"same payload"))
        .await
        .unwrap();

    assert_eq!(via_message, via_digest);
}

#[tokio::test]
async fn many_digests_all_resolve() {
    let (kms, expected) = InMemoryKms::with_key("evm-key");
    let signer = signer_for(kms, "evm-key");

    for i in 0u8..32 {
        let digest = B256::repeat_byte(i);
        let signature = signer.sign_digest(digest).await.unwrap();
        let recovered = alloy::primitives::PrimitiveSignature::from(signature)
            .recover_address_from_prehash(&digest)
            .unwrap();
        assert_eq!(recovered, expected);
    }
}

#[tokio::test]
async fn signed_typed_data_recovers_to_signer() {
    let (kms, expected) = InMemoryKms::with_key("evm-key");
    let signer = signer_for(kms, "evm-key");

    let typed_data: TypedData = serde_json::from_value(json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" }
            ],
            "Permit": [
                { "name": "owner", "type": "address" },
                { "name": "value", "type": "uint256" }
            ]
        },
        "primaryType": "Permit",
        "domain": {
            "name": "Token",
            "chainId": 1,
            "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
        },
        "message": {
            "owner": "0x61Fb9b83Ece274BdE3d1640dA6A394552a2eCC63",
            "value": "1000"
        }
    }))
    .unwrap();

    let signature = signer.sign_typed_data(&typed_data).await.unwrap();
    let digest = typed_data.eip712_signing_hash().unwrap();
    let recovered = alloy::primitives::PrimitiveSignature::from(signature)
        .recover_address_from_prehash(&digest)
        .unwrap();

    assert_eq!(recovered, expected);
}

#[tokio::test]
async fn signed_transactions_recover_to_signer() {
    let (kms, expected) = InMemoryKms::with_key("evm-key");
    let signer = signer_for(kms, "evm-key");

    let eip1559: EvmTransactionRequest = serde_json::from_value(json!({
        "to": "0x61Fb9b83Ece274BdE3d1640dA6A394552a2eCC63",
        "nonce": 7,
        "gas_limit": 50000,
        "max_fee_per_gas": 40000000000u64,
        "max_priority_fee_per_gas": 2000000000u64,
        "value": "0xde0b6b3a7640000",
        "data": "0x12345678",
        "chain_id": 10
    }))
    .unwrap();
    let legacy = EvmTransactionRequest {
        gas_price: Some(1_000_000_000),
        max_fee_per_gas: None,
        max_priority_fee_per_gas: None,
        ..eip1559.clone()
    };
    let eip2930 = EvmTransactionRequest {
        access_list: Some(
            serde_json::from_value(json!([{
                "address": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC",
                "storageKeys": []
            }]))
            .unwrap(),
        ),
        ..legacy.clone()
    };

    for request in [eip1559, legacy, eip2930] {
        let signed = signer.sign_transaction(&request).await.unwrap();

        let envelope = TxEnvelope::decode_2718(&mut signed.raw.as_slice()).unwrap();
        assert_eq!(*envelope.tx_hash(), signed.hash);

        let recovered = signer
            .recover_transaction_signer(&request, &signed.raw_hex())
            .unwrap();
        assert_eq!(recovered, expected);
    }
}

#[tokio::test]
async fn unknown_key_surfaces_kms_error() {
    let (kms, _) = InMemoryKms::with_key("evm-key");
    let sign_calls = kms.sign_calls.clone();
    let signer = signer_for(kms, "missing-key");

    let result = signer.sign_message(b"hello").await;

    assert!(matches!(
        result,
        Err(SignerError::Kms(AwsKmsError::GetError(_)))
    ));
    assert_eq!(sign_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn signature_from_another_key_is_a_recovery_mismatch() {
    /// Serves one key's public key but signs with another.
    struct SwappedKms {
        public: InMemoryKms,
        signing: InMemoryKms,
    }

    #[async_trait]
    impl AwsKmsK256 for SwappedKms {
        async fn get_der_public_key<'a, 'b>(&'a self, key_id: &'b str) -> AwsKmsResult<Vec<u8>> {
            self.public.get_der_public_key(key_id).await
        }

        async fn sign_digest<'a, 'b>(
            &'a self,
            key_id: &'b str,
            digest: [u8; 32],
        ) -> AwsKmsResult<Vec<u8>> {
            self.signing.sign_digest(key_id, digest).await
        }
    }

    let (public, _) = InMemoryKms::with_key("evm-key");
    let (signing, _) = InMemoryKms::with_key("evm-key");
    let signer = AwsKmsSigner::new(AwsKmsService::with_client(
        SwappedKms { public, signing },
        AwsKmsSignerConfig {
            key_id: "evm-key".to_string(),
            region: None,
        },
    ));

    let result = signer.sign_message(b"hello").await;
    assert!(matches!(result, Err(SignerError::RecoveryMismatch(_))));
}

//! Verification of signatures produced elsewhere: who signed this message,
//! who signed this transaction.

use alloy::{
    consensus::TxEnvelope,
    eips::eip2718::Decodable2718,
    primitives::{Address, PrimitiveSignature},
};

use crate::{
    constants::SECP256K1_SIGNATURE_LENGTH,
    models::{EvmTransactionRequest, SignerError, UnsignedEvmTransaction},
};

fn decode_hex(value: &str, field_name: &str) -> Result<Vec<u8>, SignerError> {
    let hex_str = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(hex_str)
        .map_err(|e| SignerError::InvalidSignature(format!("Invalid {field_name} hex: {e}")))
}

/// Recovers the address that produced `signature` (65 bytes, hex) over
/// the EIP-191 hash of `message`.
pub fn recover_message_signer(message: &[u8], signature: &str) -> Result<Address, SignerError> {
    let bytes = decode_hex(signature, "signature")?;
    if bytes.len() != SECP256K1_SIGNATURE_LENGTH {
        return Err(SignerError::InvalidSignature(format!(
            "expected {} bytes, got {}",
            SECP256K1_SIGNATURE_LENGTH,
            bytes.len()
        )));
    }

    let signature = PrimitiveSignature::try_from(bytes.as_slice())
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;

    signature
        .recover_address_from_msg(message)
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))
}

/// Recovers the address that signed `signed_tx` (EIP-2718 bytes, hex).
///
/// The digest comes from the unsigned encoding of `request`, the signature
/// and its parity from the signed envelope.
pub fn recover_transaction_signer(
    request: &EvmTransactionRequest,
    signed_tx: &str,
) -> Result<Address, SignerError> {
    let digest = UnsignedEvmTransaction::try_from(request)?.signature_hash();

    let raw = decode_hex(signed_tx, "signed transaction")?;
    let envelope = TxEnvelope::decode_2718(&mut raw.as_slice()).map_err(|e| {
        SignerError::InvalidSignature(format!("Failed to decode signed transaction: {e}"))
    })?;

    let signature = match &envelope {
        TxEnvelope::Legacy(tx) => *tx.signature(),
        TxEnvelope::Eip2930(tx) => *tx.signature(),
        TxEnvelope::Eip1559(tx) => *tx.signature(),
        TxEnvelope::Eip4844(tx) => *tx.signature(),
        TxEnvelope::Eip7702(tx) => *tx.signature(),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(SignerError::InvalidSignature(
                "Unsupported transaction envelope".to_string(),
            ))
        }
    };

    signature
        .recover_address_from_prehash(&digest)
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))
}

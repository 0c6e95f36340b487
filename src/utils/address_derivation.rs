//! Derivation of EVM addresses from secp256k1 public keys.
//!
//! Keys arrive either as the raw uncompressed point, as a DER
//! `SubjectPublicKeyInfo` (what AWS KMS returns) or as PEM.

use alloy::primitives::{keccak256, Address};

use super::der::decode_der_public_key;
use crate::constants::{UNCOMPRESSED_PUBLIC_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_PREFIX};

#[derive(Debug, thiserror::Error)]
pub enum AddressDerivationError {
    #[error("Parse Error: {0}")]
    ParseError(String),
}

/// Derive EVM address from an uncompressed `0x04 || X || Y` point.
pub fn derive_ethereum_address(point: &[u8]) -> Result<Address, AddressDerivationError> {
    if point.len() != UNCOMPRESSED_PUBLIC_KEY_LENGTH {
        return Err(AddressDerivationError::ParseError(format!(
            "Invalid public key length: expected {} bytes, got {}",
            UNCOMPRESSED_PUBLIC_KEY_LENGTH,
            point.len()
        )));
    }
    if point[0] != UNCOMPRESSED_PUBLIC_KEY_PREFIX {
        return Err(AddressDerivationError::ParseError(format!(
            "Invalid public key prefix: expected 0x04, got {:#04x}",
            point[0]
        )));
    }

    let hash = keccak256(&point[1..]);

    // Take the last 20 bytes of the hash
    Ok(Address::from_slice(&hash[12..]))
}

/// Derive EVM address from the DER payload.
pub fn derive_ethereum_address_from_der(der: &[u8]) -> Result<Address, AddressDerivationError> {
    let point =
        decode_der_public_key(der).map_err(|e| AddressDerivationError::ParseError(e.to_string()))?;
    derive_ethereum_address(&point)
}

/// Derive EVM address from the PEM string.
pub fn derive_ethereum_address_from_pem(pem_str: &str) -> Result<Address, AddressDerivationError> {
    let pkey =
        pem::parse(pem_str).map_err(|e| AddressDerivationError::ParseError(e.to_string()))?;
    derive_ethereum_address_from_der(pkey.contents())
}

/// EIP-55 mixed-case rendering.
pub fn to_checksum_address(address: &Address) -> String {
    address.to_checksum(None)
}

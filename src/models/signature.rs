//! Signature types flowing through the KMS signing pipeline.
//!
//! ```text
//! DER bytes ──► DerSignature ──► NormalizedSignature ──► RecoverableSignature
//!              (r, s as parsed)   (low-s, 256-bit)        (r, s, v = 27 | 28)
//! ```

use std::fmt;

use alloy::primitives::{PrimitiveSignature, U256};
use serde::Serialize;
use simple_asn1::BigUint;

use crate::{
    constants::{SCALAR_LENGTH, SECP256K1_N, SECP256K1_SIGNATURE_LENGTH},
    models::SignerError,
    utils::normalize_s,
};

/// `r` and `s` exactly as they were decoded from the DER `SEQUENCE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerSignature {
    pub r: BigUint,
    pub s: BigUint,
}

/// An ECDSA signature whose `s` lies in the lower half of the curve order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSignature {
    pub r: U256,
    pub s: U256,
}

impl NormalizedSignature {
    /// Builds a normalized signature, canonicalizing `s` to its low form.
    ///
    /// Fails when either scalar lies outside `[1, N-1]`.
    pub fn new(r: U256, s: U256) -> Result<Self, SignerError> {
        check_scalar_range(r, "r")?;
        check_scalar_range(s, "s")?;

        Ok(Self {
            r,
            s: normalize_s(s),
        })
    }
}

impl TryFrom<DerSignature> for NormalizedSignature {
    type Error = SignerError;

    fn try_from(der: DerSignature) -> Result<Self, Self::Error> {
        let r = biguint_to_u256(&der.r, "r")?;
        let s = biguint_to_u256(&der.s, "s")?;
        Self::new(r, s)
    }
}

fn biguint_to_u256(value: &BigUint, name: &str) -> Result<U256, SignerError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > SCALAR_LENGTH {
        return Err(SignerError::MalformedEncoding(format!(
            "Signature component {name} is {} bytes long, expected at most {SCALAR_LENGTH}",
            bytes.len()
        )));
    }
    Ok(U256::from_be_slice(&bytes))
}

fn check_scalar_range(value: U256, name: &str) -> Result<(), SignerError> {
    if value.is_zero() || value >= SECP256K1_N {
        return Err(SignerError::MalformedEncoding(format!(
            "Signature component {name} is outside the secp256k1 scalar range"
        )));
    }
    Ok(())
}

/// A recoverable EVM signature, `v` in Electrum notation (27 or 28).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoverableSignature {
    pub r: U256,
    pub s: U256,
    pub v: u8,
}

impl RecoverableSignature {
    pub fn new(signature: NormalizedSignature, v: u8) -> Self {
        Self {
            r: signature.r,
            s: signature.s,
            v,
        }
    }

    /// Odd y-coordinate of the ephemeral point, i.e. `v == 28`.
    pub fn y_parity(&self) -> bool {
        self.v == 28
    }

    /// Serializes as `r (32 bytes) || s (32 bytes) || v (1 byte)`.
    pub fn as_bytes(&self) -> [u8; SECP256K1_SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SECP256K1_SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        bytes[64] = self.v;
        bytes
    }

    pub fn r_hex(&self) -> String {
        hex::encode(self.r.to_be_bytes::<32>())
    }

    pub fn s_hex(&self) -> String {
        hex::encode(self.s.to_be_bytes::<32>())
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

impl From<RecoverableSignature> for PrimitiveSignature {
    fn from(signature: RecoverableSignature) -> Self {
        PrimitiveSignature::new(signature.r, signature.s, signature.y_parity())
    }
}

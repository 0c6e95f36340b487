//! Decoding of the two fixed DER structures returned by AWS KMS.
//!
//! ```text
//! Ecdsa-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }
//!
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm  SEQUENCE { id-ecPublicKey OID, secp256k1 OID },
//!     publicKey  BIT STRING
//! }
//! ```
//!
//! Decoding is strict: bytes trailing the outer `SEQUENCE` are rejected.
//! Range and curve-membership checks of the decoded values are left to
//! the caller.

use simple_asn1::{from_der, oid, ASN1Block, OID};

use crate::models::DerSignature;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DerError {
    #[error("ASN.1 decode error: {0}")]
    Asn1(String),
    #[error("Unexpected DER structure: {0}")]
    UnexpectedStructure(String),
    #[error("Unexpected trailing data: {0} extra top-level element(s)")]
    TrailingData(usize),
}

/// id-ecPublicKey, RFC 5480
fn ec_public_key_oid() -> OID {
    oid!(1, 2, 840, 10045, 2, 1)
}

/// secp256k1, SEC 2
fn secp256k1_oid() -> OID {
    oid!(1, 3, 132, 0, 10)
}

/// Parses `der` and returns its single top-level element.
fn decode_single_block(der: &[u8]) -> Result<ASN1Block, DerError> {
    let mut blocks = from_der(der).map_err(|e| DerError::Asn1(e.to_string()))?;
    match blocks.len() {
        0 => Err(DerError::UnexpectedStructure("empty input".to_string())),
        1 => Ok(blocks.remove(0)),
        n => Err(DerError::TrailingData(n - 1)),
    }
}

/// Decodes a DER `SEQUENCE { r INTEGER, s INTEGER }` ECDSA signature.
pub fn decode_der_signature(der: &[u8]) -> Result<DerSignature, DerError> {
    let items = match decode_single_block(der)? {
        ASN1Block::Sequence(_, items) => items,
        _ => {
            return Err(DerError::UnexpectedStructure(
                "signature is not a SEQUENCE".to_string(),
            ))
        }
    };

    match items.as_slice() {
        [ASN1Block::Integer(_, r), ASN1Block::Integer(_, s)] => {
            let r = r.to_biguint().ok_or_else(|| {
                DerError::UnexpectedStructure("signature component r is negative".to_string())
            })?;
            let s = s.to_biguint().ok_or_else(|| {
                DerError::UnexpectedStructure("signature component s is negative".to_string())
            })?;
            Ok(DerSignature { r, s })
        }
        _ => Err(DerError::UnexpectedStructure(
            "signature SEQUENCE must hold exactly two INTEGERs".to_string(),
        )),
    }
}

/// Decodes a DER EC `SubjectPublicKeyInfo` and returns the raw point bytes
/// (the BIT STRING payload without the unused-bits byte).
pub fn decode_der_public_key(der: &[u8]) -> Result<Vec<u8>, DerError> {
    let items = match decode_single_block(der)? {
        ASN1Block::Sequence(_, items) => items,
        _ => {
            return Err(DerError::UnexpectedStructure(
                "public key info is not a SEQUENCE".to_string(),
            ))
        }
    };

    let (algorithm, public_key) = match items.as_slice() {
        [ASN1Block::Sequence(_, algorithm), ASN1Block::BitString(_, bits, public_key)] => {
            if *bits != public_key.len() * 8 {
                return Err(DerError::UnexpectedStructure(
                    "public key BIT STRING has unused bits".to_string(),
                ));
            }
            (algorithm, public_key)
        }
        _ => {
            return Err(DerError::UnexpectedStructure(
                "public key info must be SEQUENCE { AlgorithmIdentifier, BIT STRING }".to_string(),
            ))
        }
    };

    match algorithm.as_slice() {
        [ASN1Block::ObjectIdentifier(_, algorithm_oid), ASN1Block::ObjectIdentifier(_, curve_oid)] =>
        {
            if *algorithm_oid != ec_public_key_oid() {
                return Err(DerError::UnexpectedStructure(
                    "public key algorithm is not id-ecPublicKey".to_string(),
                ));
            }
            if *curve_oid != secp256k1_oid() {
                return Err(DerError::UnexpectedStructure(
                    "public key curve is not secp256k1".to_string(),
                ));
            }
        }
        _ => {
            return Err(DerError::UnexpectedStructure(
                "AlgorithmIdentifier must hold two OBJECT IDENTIFIERs".to_string(),
            ))
        }
    }

    Ok(public_key.clone())
}

use alloy::primitives::{Address, PrimitiveSignature, B256, U256};
use log::debug;
use serde::Serialize;

use crate::{
    constants::{RECOVERY_V_CANDIDATES, SECP256K1_HALF_N, SECP256K1_N},
    models::NormalizedSignature,
};

#[derive(Debug, Clone, thiserror::Error, Serialize)]
pub enum Secp256k1Error {
    #[error("Secp256k1 recovery error: {0}")]
    RecoveryMismatch(String),
}

/// Canonicalizes `s` to the lower half of the curve order (EIP-2).
pub fn normalize_s(s: U256) -> U256 {
    if s > SECP256K1_HALF_N {
        SECP256K1_N - s
    } else {
        s
    }
}

/// Finds the recovery value `v` (27 or 28) for which `(r, s, v)` over
/// `digest` recovers to `address`.
///
/// Candidates are tried in ascending order and the first match wins.
/// A candidate whose recovery fails outright is skipped.
pub fn resolve_recovery_v(
    digest: &B256,
    signature: &NormalizedSignature,
    address: &Address,
) -> Result<u8, Secp256k1Error> {
    for v in RECOVERY_V_CANDIDATES {
        let candidate = PrimitiveSignature::new(signature.r, signature.s, v == 28);

        match candidate.recover_address_from_prehash(digest) {
            Ok(recovered) if recovered == *address => return Ok(v),
            Ok(recovered) => {
                debug!("v={} recovers {}, expected {}", v, recovered, address);
            }
            Err(e) => {
                debug!("v={} failed to recover: {}", v, e);
            }
        }
    }

    Err(Secp256k1Error::RecoveryMismatch(format!(
        "signature is invalid, recovered address does not match {}",
        address.to_checksum(None)
    )))
}

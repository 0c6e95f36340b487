//! Turns the DER signature returned by KMS into an EVM signature.

use alloy::primitives::{Address, B256};
use log::debug;

use crate::{
    models::{NormalizedSignature, RecoverableSignature, SignerError},
    utils::{decode_der_signature, resolve_recovery_v},
};

/// Decodes `der_signature`, normalizes `s` (EIP-2) and resolves the `v`
/// that makes the signature over `digest` recover to `address`.
pub fn assemble_evm_signature(
    der_signature: &[u8],
    digest: &B256,
    address: &Address,
) -> Result<RecoverableSignature, SignerError> {
    let decoded = decode_der_signature(der_signature)?;
    let normalized = NormalizedSignature::try_from(decoded)?;
    let v = resolve_recovery_v(digest, &normalized, address)?;

    let signature = RecoverableSignature::new(normalized, v);
    debug!("assembled signature {} over digest {}", signature, digest);

    Ok(signature)
}

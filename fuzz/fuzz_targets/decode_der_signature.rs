#![no_main]

use evm_kms_signer::{models::NormalizedSignature, utils::decode_der_signature};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(signature) = decode_der_signature(data) {
        let _ = NormalizedSignature::try_from(signature);
    }
});

#![no_main]

use evm_kms_signer::utils::derive_ethereum_address_from_der;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = derive_ethereum_address_from_der(data);
});

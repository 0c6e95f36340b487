//! Fixtures captured from a live AWS KMS secp256k1 key.

use alloy::primitives::{address, b256, Address, B256};

pub const TEST_ADDRESS: Address = address!("61Fb9b83Ece274BdE3d1640dA6A394552a2eCC63");

/// DER `SubjectPublicKeyInfo` of the key behind [`TEST_ADDRESS`].
pub const TEST_PUBLIC_KEY_DER: [u8; 88] = [
    48, 86, 48, 16, 6, 7, 42, 134, 72, 206, 61, 2, 1, 6, 5, 43, 129, 4, 0, 10, 3, 66, 0, 4, 87, 202,
    103, 165, 19, 10, 177, 50, 158, 213, 207, 93, 82, 189, 40, 128, 20, 224, 243, 125, 34, 179,
    119, 116, 73, 48, 94, 225, 217, 83, 234, 72, 38, 68, 50, 93, 170, 57, 79, 192, 55, 79, 130,
    216, 172, 233, 180, 14, 145, 34, 3, 252, 191, 22, 17, 131, 18, 190, 144, 163, 211, 100, 42,
    138,
];

pub const TEST_DIGEST: B256 =
    b256!("8dc615c031fed47d7481d250f8c91b4f5efe5b57cc4b2bb2e80e1dd280d37758");

/// KMS signature over [`TEST_DIGEST`]. Its `s` is already low.
pub const TEST_SIGNATURE_DER: [u8; 70] = [
    48, 68, 2, 32, 100, 11, 152, 149, 198, 140, 255, 76, 28, 197, 217, 187, 19, 51, 120, 29, 109,
    228, 78, 209, 225, 134, 198, 146, 36, 70, 149, 247, 201, 174, 208, 106, 2, 32, 0, 235, 166, 138,
    103, 165, 42, 183, 191, 186, 136, 211, 55, 153, 83, 255, 78, 89, 199, 26, 191, 145, 57, 102, 67,
    190, 246, 32, 217, 41, 16, 211,
];

pub const TEST_SIGNATURE_HEX: &str = "0x640b9895c68cff4c1cc5d9bb1333781d6de44ed1e186c692244695f7c9aed06a00eba68a67a52ab7bfba88d3379953ff4e59c71abf91396643bef620d92910d31c";

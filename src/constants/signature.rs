//! secp256k1 and Ethereum signature constants

use alloy::primitives::{uint, U256};

/// Order of the secp256k1 group.
/// See <https://www.secg.org/sec2-v2.pdf>
pub const SECP256K1_N: U256 =
    uint!(0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141_U256);

/// `SECP256K1_N / 2`, the largest `s` accepted under EIP-2.
pub const SECP256K1_HALF_N: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// SECP256K1 signature length: 32 bytes (r) + 32 bytes (s) + 1 byte (v)
pub const SECP256K1_SIGNATURE_LENGTH: usize = 65;

/// Uncompressed SEC1 point length: 1 byte prefix + 32 bytes (x) + 32 bytes (y)
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Prefix byte of an uncompressed SEC1 point
pub const UNCOMPRESSED_PUBLIC_KEY_PREFIX: u8 = 0x04;

/// Length of a 256-bit scalar in bytes
pub const SCALAR_LENGTH: usize = 32;

/// Recovery ids in Electrum notation, tried in this order
pub const RECOVERY_V_CANDIDATES: [u8; 2] = [27, 28];

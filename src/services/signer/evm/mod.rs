//! # EVM Signer Implementations
//!
//! ```text
//! EVM Signer
//!   ├── AwsKmsSigner   - AWS Key Management Service (secp256k1)
//!   ├── utils          - DER signature → EVM signature (low-s, v recovery)
//!   └── recovery       - signer recovery for messages and transactions
//! ```
//!
//! All signatures carry a low `s` (EIP-2) and `v ∈ {27, 28}`.

mod aws_kms_signer;
pub use aws_kms_signer::*;

mod recovery;
pub use recovery::*;

pub mod utils;
pub use utils::assemble_evm_signature;

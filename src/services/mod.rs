//! # Services Module
//!
//! External integrations (AWS KMS) and the signers built on top of them.

mod aws_kms;
pub use aws_kms::*;

mod signer;
pub use signer::*;

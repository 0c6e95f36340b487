mod error;
pub use error::*;

mod signature;
pub use signature::*;

mod evm_transaction;
pub use evm_transaction::*;

mod signer;
pub use signer::*;

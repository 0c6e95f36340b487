//! Ethereum-compatible signing with secp256k1 keys held in AWS KMS.
//!
//! KMS returns ASN.1 DER: an ECDSA `SEQUENCE { r, s }` for signatures and a
//! `SubjectPublicKeyInfo` for the public key. This crate turns those into
//! 65-byte `r || s || v` signatures with a low `s` and the recovery value
//! that reproduces the key's address, and uses them to sign EIP-191
//! messages, EIP-712 typed data and legacy or EIP-1559 transactions.

pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

use std::str::FromStr;

use alloy::{
    consensus::{SignableTransaction, TxEip1559, TxEip2930, TxEnvelope, TxLegacy, TxType},
    eips::eip2930::AccessList,
    primitives::{Address as AlloyAddress, Bytes, PrimitiveSignature, TxKind, B256, U256},
};
use serde::{Deserialize, Serialize};

use crate::models::{RecoverableSignature, SignerError};

/// Unsigned EVM transaction fields as supplied by the caller.
///
/// `from` is accepted for convenience but never encoded: the signer's own
/// address is what ends up recoverable from the signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvmTransactionRequest {
    /// EIP-2718 type: 0 legacy, 1 EIP-2930, 2 EIP-1559. Inferred when unset.
    #[serde(default, rename = "type", alias = "transaction_type")]
    pub transaction_type: Option<u8>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub gas_limit: u64,
    #[serde(default)]
    pub gas_price: Option<u128>,
    #[serde(default)]
    pub max_fee_per_gas: Option<u128>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub access_list: Option<AccessList>,
    /// 0 signs a legacy transaction without EIP-155 replay protection.
    pub chain_id: u64,
}

impl EvmTransactionRequest {
    /// Resolves the envelope type.
    ///
    /// Without an explicit type: EIP-1559 when a 1559 fee field is set or no
    /// gas price is given, otherwise EIP-2930 when an access list is given,
    /// otherwise legacy.
    pub fn tx_type(&self) -> Result<TxType, SignerError> {
        match self.transaction_type {
            Some(0) => Ok(TxType::Legacy),
            Some(1) => Ok(TxType::Eip2930),
            Some(2) => Ok(TxType::Eip1559),
            Some(other) => Err(SignerError::InvalidTransaction(format!(
                "Unsupported transaction type {other}"
            ))),
            None if self.max_fee_per_gas.is_some()
                || self.max_priority_fee_per_gas.is_some()
                || self.gas_price.is_none() =>
            {
                Ok(TxType::Eip1559)
            }
            None if self.access_list.is_some() => Ok(TxType::Eip2930),
            None => Ok(TxType::Legacy),
        }
    }

    fn tx_kind(&self) -> Result<TxKind, SignerError> {
        match self.to.as_deref() {
            None | Some("") => Ok(TxKind::Create),
            Some(to) => AlloyAddress::from_str(to)
                .map(TxKind::Call)
                .map_err(|e| {
                    SignerError::InvalidTransaction(format!("Invalid 'to' address {to}: {e}"))
                }),
        }
    }

    fn input(&self) -> Result<Bytes, SignerError> {
        match self.data.as_deref() {
            None => Ok(Bytes::new()),
            Some(data) => Bytes::from_str(data).map_err(|e| {
                SignerError::InvalidTransaction(format!("Invalid 'data' hex: {e}"))
            }),
        }
    }

    fn access_list(&self) -> AccessList {
        self.access_list.clone().unwrap_or_default()
    }
}

impl TryFrom<&EvmTransactionRequest> for TxLegacy {
    type Error = SignerError;

    fn try_from(request: &EvmTransactionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            chain_id: (request.chain_id != 0).then_some(request.chain_id),
            nonce: request.nonce,
            gas_price: request.gas_price.unwrap_or_default(),
            gas_limit: request.gas_limit,
            to: request.tx_kind()?,
            value: request.value,
            input: request.input()?,
        })
    }
}

impl TryFrom<&EvmTransactionRequest> for TxEip2930 {
    type Error = SignerError;

    fn try_from(request: &EvmTransactionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            chain_id: request.chain_id,
            nonce: request.nonce,
            gas_price: request.gas_price.unwrap_or_default(),
            gas_limit: request.gas_limit,
            to: request.tx_kind()?,
            value: request.value,
            access_list: request.access_list(),
            input: request.input()?,
        })
    }
}

impl TryFrom<&EvmTransactionRequest> for TxEip1559 {
    type Error = SignerError;

    fn try_from(request: &EvmTransactionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            chain_id: request.chain_id,
            nonce: request.nonce,
            gas_limit: request.gas_limit,
            max_fee_per_gas: request.max_fee_per_gas.unwrap_or_default(),
            max_priority_fee_per_gas: request.max_priority_fee_per_gas.unwrap_or_default(),
            to: request.tx_kind()?,
            value: request.value,
            access_list: request.access_list(),
            input: request.input()?,
        })
    }
}

/// Transaction resolved from an [`EvmTransactionRequest`], ready for signing.
#[derive(Debug, Clone, PartialEq)]
pub enum UnsignedEvmTransaction {
    Legacy(TxLegacy),
    Eip2930(TxEip2930),
    Eip1559(TxEip1559),
}

impl TryFrom<&EvmTransactionRequest> for UnsignedEvmTransaction {
    type Error = SignerError;

    fn try_from(request: &EvmTransactionRequest) -> Result<Self, Self::Error> {
        match request.tx_type()? {
            TxType::Legacy => Ok(Self::Legacy(TxLegacy::try_from(request)?)),
            TxType::Eip2930 => Ok(Self::Eip2930(TxEip2930::try_from(request)?)),
            TxType::Eip1559 => Ok(Self::Eip1559(TxEip1559::try_from(request)?)),
            other => Err(SignerError::InvalidTransaction(format!(
                "Unsupported transaction type {other:?}"
            ))),
        }
    }
}

impl UnsignedEvmTransaction {
    /// keccak256 of the unsigned encoding, the digest that gets signed.
    pub fn signature_hash(&self) -> B256 {
        match self {
            Self::Legacy(tx) => tx.signature_hash(),
            Self::Eip2930(tx) => tx.signature_hash(),
            Self::Eip1559(tx) => tx.signature_hash(),
        }
    }

    /// Embeds the signature and returns the signed envelope.
    pub fn into_envelope(self, signature: PrimitiveSignature) -> TxEnvelope {
        match self {
            Self::Legacy(tx) => TxEnvelope::from(tx.into_signed(signature)),
            Self::Eip2930(tx) => TxEnvelope::from(tx.into_signed(signature)),
            Self::Eip1559(tx) => TxEnvelope::from(tx.into_signed(signature)),
        }
    }
}

/// A signed transaction: its hash, signature and EIP-2718 serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    pub hash: B256,
    pub signature: RecoverableSignature,
    pub raw: Vec<u8>,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// A transaction as handed to a Chain Client.
///
/// Nonce management and signing of the envelope are the client's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: U256,
}

/// Mined transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub tx_hash: B256,
    /// `true` when the transaction executed without reverting
    pub success: bool,
    pub block_number: u64,
    pub contract_address: Option<Address>,
}

/// Transaction lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInfo {
    pub hash: B256,
    pub to: Option<Address>,
    /// `None` while the transaction is still pending
    pub block_number: Option<u64>,
    /// Return data of the top-level call, used for magic-value checks
    pub output: Bytes,
}

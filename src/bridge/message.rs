use alloy_primitives::{keccak256, Address, Bytes, FixedBytes, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::abi::CodecError;
use super::codec;
use super::selectors;
use crate::errors::DeployError;
use crate::network::ChainId;

/// A payload travelling from `from_chain` to `to_chain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeMessage {
    pub from_chain: ChainId,
    pub to_chain: ChainId,
    pub sender: Address,
    pub payload: Bytes,
    /// Magic value the destination must return from `bridgeIn`
    pub selector: FixedBytes<4>,
}

impl BridgeMessage {
    pub fn new(from_chain: ChainId, to_chain: ChainId, sender: Address, payload: Bytes) -> Self {
        Self { from_chain, to_chain, sender, payload, selector: selectors::bridge_in() }
    }

    /// Stable identifier used to detect replays on the destination.
    ///
    /// `keccak256(fromChain ‖ toChain ‖ sender ‖ keccak256(payload))`
    pub fn id(&self) -> B256 {
        let mut packed = Vec::with_capacity(8 + 8 + 20 + 32);
        packed.extend_from_slice(&self.from_chain.get().to_be_bytes());
        packed.extend_from_slice(&self.to_chain.get().to_be_bytes());
        packed.extend_from_slice(self.sender.as_slice());
        packed.extend_from_slice(keccak256(&self.payload).as_slice());
        keccak256(packed)
    }

    /// Source-chain calldata that emits this message.
    pub fn bridge_out_calldata(&self) -> Result<Bytes, DeployError> {
        codec::encode_bridge_out(self.to_chain, self.sender, &self.payload)
    }

    /// Destination-chain calldata that consumes `data` returned by `bridgeOut`.
    pub fn bridge_in_calldata(&self, data: &[u8]) -> Result<Bytes, DeployError> {
        codec::encode_bridge_in(self.from_chain, data)
    }
}

/// A bridge call that returned its magic value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub selector: FixedBytes<4>,
    /// Data carried forward (`bridgeOut` only; empty for `bridgeIn`)
    pub data: Bytes,
}

/// Why a bridge call is considered not applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejected {
    /// The call returned something other than the magic value
    #[error("selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch {
        /// Magic value for the operation
        expected: FixedBytes<4>,
        /// Value actually returned
        got: FixedBytes<4>,
    },

    /// Return data could not be decoded
    #[error("malformed return data: {0}")]
    Malformed(#[from] CodecError),

    /// The destination already consumed this message
    #[error("bridge message {0} already applied")]
    AlreadyApplied(B256),
}

impl Rejected {
    /// Surface the rejection as a non-retryable deployment error.
    pub fn into_error(self, chain_id: ChainId) -> DeployError {
        DeployError::BridgeOperationFailed { chain_id, reason: self.to_string() }
    }
}

/// Outcome of a bridge call, judged by its magic return value.
pub type BridgeOutcome = Result<Applied, Rejected>;

/// Judge `bridgeIn` return data.
pub fn classify_bridge_in(output: &[u8]) -> BridgeOutcome {
    let got = codec::decode_bridge_in(output)?;
    check_selector(selectors::bridge_in(), got)?;
    Ok(Applied { selector: got, data: Bytes::new() })
}

/// Judge `bridgeOut` return data.
pub fn classify_bridge_out(output: &[u8]) -> BridgeOutcome {
    let decoded = codec::decode_bridge_out(output)?;
    check_selector(selectors::bridge_out(), decoded.selector)?;
    Ok(Applied { selector: decoded.selector, data: decoded.data })
}

fn check_selector(expected: FixedBytes<4>, got: FixedBytes<4>) -> Result<(), Rejected> {
    if expected != got {
        return Err(Rejected::SelectorMismatch { expected, got });
    }
    Ok(())
}

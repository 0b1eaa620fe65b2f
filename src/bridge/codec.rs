use alloy_primitives::{Address, Bytes, FixedBytes};
use alloy_sol_types::SolCall;

use super::abi::{
    self, bridgeInCall, bridgeOutCall, decode_bytes4, decode_usize, encode_bytes4, encode_usize,
    padded_len, word_at, word_at_offset, CodecError, WORD,
};
use crate::errors::DeployError;
use crate::network::ChainId;

/// Decoded return value of `bridgeOut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOutReturn {
    pub selector: FixedBytes<4>,
    /// Payload to forward to the destination's `bridgeIn`
    pub data: Bytes,
}

/// Calldata for `bridgeOut(toChain, sender, payload)`.
pub fn encode_bridge_out(
    to_chain: ChainId,
    sender: Address,
    payload: &[u8],
) -> Result<Bytes, DeployError> {
    let call = bridgeOutCall {
        toChain: to_chain.as_u32()?,
        sender,
        payload: Bytes::copy_from_slice(payload),
    };
    Ok(call.abi_encode().into())
}

/// Calldata for `bridgeIn(fromChain, payload)`.
pub fn encode_bridge_in(from_chain: ChainId, payload: &[u8]) -> Result<Bytes, DeployError> {
    let call = bridgeInCall { fromChain: from_chain.as_u32()?, payload: Bytes::copy_from_slice(payload) };
    Ok(call.abi_encode().into())
}

/// Decode the `(bytes4 selector, bytes data)` returned by `bridgeOut`.
pub fn decode_bridge_out(output: &[u8]) -> Result<BridgeOutReturn, CodecError> {
    let selector = decode_bytes4(word_at(output, 0)?)?;
    let offset = decode_usize(word_at(output, 1)?)?;
    let len = decode_usize(word_at_offset(output, offset)?)?;

    let start = offset + WORD;
    let end = start + len;
    let data = output
        .get(start..end)
        .ok_or(CodecError::Truncated { needed: end, got: output.len() })?;
    Ok(BridgeOutReturn { selector, data: Bytes::copy_from_slice(data) })
}

/// Decode the `bytes4 selector` returned by `bridgeIn`.
pub fn decode_bridge_in(output: &[u8]) -> Result<FixedBytes<4>, CodecError> {
    decode_bytes4(word_at(output, 0)?)
}

/// Return data of a `bridgeOut` call, as a holographable contract produces it.
pub fn encode_bridge_out_return(selector: FixedBytes<4>, data: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(3 * WORD + padded_len(data.len()));
    out.extend_from_slice(encode_bytes4(selector).as_slice());
    out.extend_from_slice(encode_usize(2 * WORD).as_slice());
    out.extend_from_slice(encode_usize(data.len()).as_slice());
    out.extend_from_slice(data);
    out.resize(3 * WORD + padded_len(data.len()), 0);
    out.into()
}

/// Return data of a `bridgeIn` call.
pub fn encode_bridge_in_return(selector: FixedBytes<4>) -> Bytes {
    Bytes::copy_from_slice(encode_bytes4(selector).as_slice())
}

/// Selector of the `bridgeIn` function itself (also its magic value).
pub fn bridge_in_selector() -> FixedBytes<4> {
    FixedBytes::from(abi::bridgeInCall::SELECTOR)
}

/// Selector of the `bridgeOut` function itself (also its magic value).
pub fn bridge_out_selector() -> FixedBytes<4> {
    FixedBytes::from(abi::bridgeOutCall::SELECTOR)
}

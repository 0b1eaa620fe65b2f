//! Contract interfaces and return-data word helpers.
//!
//! Calldata is produced from the `sol!` interfaces below. Return data of the
//! two bridge calls is small and fixed in shape, so it is read word by word.

use alloy_primitives::{FixedBytes, B256, U256};
use alloy_sol_types::sol;
use thiserror::Error;

sol! {
    /// ABI shape of `DeploymentConfig`.
    struct DeploymentConfigAbi {
        bytes32 contractType;
        uint32 chainType;
        bytes32 salt;
        bytes byteCode;
        bytes initCode;
    }

    /// ABI shape of `Verification`.
    struct VerificationAbi {
        bytes32 r;
        bytes32 s;
        uint8 v;
    }

    /// HolographFactory entry point.
    function deployHolographableContract(DeploymentConfigAbi config, VerificationAbi signature, address signer);

    /// Holographable bridge hooks.
    function bridgeIn(uint32 fromChain, bytes payload) returns (bytes4 selector);
    function bridgeOut(uint32 toChain, address sender, bytes payload) returns (bytes4 selector, bytes data);

    /// HolographGenesis approval entry point.
    function approveDeployer(uint256 nonce, address deployer, bool approve, VerificationAbi signature);
}

/// Size of an ABI word.
pub const WORD: usize = 32;

/// Errors decoding bridge return data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes than the layout needs
    #[error("return data truncated: need {needed} bytes, got {got}")]
    Truncated {
        /// Bytes required
        needed: usize,
        /// Bytes available
        got: usize,
    },

    /// A `bytes4` word has non-zero padding
    #[error("bytes4 word has non-zero padding")]
    DirtyPadding,

    /// An offset or length word does not fit the data
    #[error("offset or length {0} out of range")]
    OutOfRange(U256),
}

/// Read the `index`-th word of `data`.
pub fn word_at(data: &[u8], index: usize) -> Result<B256, CodecError> {
    word_at_offset(data, index * WORD)
}

/// Read the word starting at byte `offset`.
pub fn word_at_offset(data: &[u8], offset: usize) -> Result<B256, CodecError> {
    let end = offset.checked_add(WORD).ok_or(CodecError::OutOfRange(U256::from(offset)))?;
    data.get(offset..end)
        .map(B256::from_slice)
        .ok_or(CodecError::Truncated { needed: end, got: data.len() })
}

/// Decode a left-aligned `bytes4` word.
pub fn decode_bytes4(word: B256) -> Result<FixedBytes<4>, CodecError> {
    if word[4..].iter().any(|b| *b != 0) {
        return Err(CodecError::DirtyPadding);
    }
    Ok(FixedBytes::from_slice(&word[..4]))
}

/// Encode a `bytes4` as a left-aligned word.
pub fn encode_bytes4(value: FixedBytes<4>) -> B256 {
    let mut word = [0u8; WORD];
    word[..4].copy_from_slice(value.as_slice());
    B256::from(word)
}

/// Decode an offset/length word. Values above `u32::MAX` are rejected.
pub fn decode_usize(word: B256) -> Result<usize, CodecError> {
    let value = U256::from_be_bytes(word.0);
    if value > U256::from(u32::MAX) {
        return Err(CodecError::OutOfRange(value));
    }
    Ok(value.to::<usize>())
}

/// Encode a `usize` into a word.
pub fn encode_usize(value: usize) -> B256 {
    B256::from(U256::from(value).to_be_bytes())
}

/// Number of bytes `len` occupies once right-padded to whole words.
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

use alloy_primitives::{keccak256, FixedBytes};

use crate::constants::{BRIDGE_IN_SIGNATURE, BRIDGE_OUT_SIGNATURE};

/// Compute the Solidity function selector (first 4 bytes of keccak256(signature)).
pub fn function_selector(signature: &str) -> FixedBytes<4> {
    let hash = keccak256(signature.as_bytes());
    FixedBytes::from_slice(&hash[..4])
}

/// Magic value a holographable contract returns from a successful `bridgeIn`.
pub fn bridge_in() -> FixedBytes<4> {
    function_selector(BRIDGE_IN_SIGNATURE)
}

/// Magic value a holographable contract returns from a successful `bridgeOut`.
pub fn bridge_out() -> FixedBytes<4> {
    function_selector(BRIDGE_OUT_SIGNATURE)
}

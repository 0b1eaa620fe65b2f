//! Bridge message encoding and outcome classification.
//!
//! A holographable contract acknowledges a bridge call by returning the
//! selector of the function that was called. Anything else, including data
//! that cannot be decoded, means the operation was not applied.

pub mod abi;
pub mod codec;
pub mod message;
pub mod selectors;

pub use abi::CodecError;
pub use codec::BridgeOutReturn;
pub use message::{classify_bridge_in, classify_bridge_out, Applied, BridgeMessage, BridgeOutcome, Rejected};

/// Salt hash length in bytes (truncated keccak256 of the deployer secret)
pub const SALT_HASH_LENGTH: usize = 20;
/// Zero bytes prepended to the salt hash to form the 32-byte CREATE2 salt
pub const SALT_PADDING_LENGTH: usize = 32 - SALT_HASH_LENGTH;
/// Packed signature length (r=32, s=32, v=1)
pub const SIGNATURE_LENGTH: usize = 65;
/// Contract-type names are right-aligned into a bytes32
pub const MAX_CONTRACT_TYPE_LENGTH: usize = 32;

/// `Holographable.bridgeIn` signature; its selector is the bridge-in magic value
pub const BRIDGE_IN_SIGNATURE: &str = "bridgeIn(uint32,bytes)";
/// `Holographable.bridgeOut` signature; its selector is the bridge-out magic value
pub const BRIDGE_OUT_SIGNATURE: &str = "bridgeOut(uint32,address,bytes)";

/// Extra submission attempts after a connection failure
pub const DEFAULT_SUBMIT_RETRIES: u32 = 3;
/// Overall multi-chain request budget
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
/// Gas limit for direct factory deployments
pub const DEFAULT_DIRECT_GAS_LIMIT: u64 = 7_000_000;
/// Gas price for direct factory deployments (1 gwei)
pub const DEFAULT_DIRECT_GAS_PRICE_WEI: u64 = 1_000_000_000;

//! Deployer-private salt derivation.
//!
//! The salt hash is the first 20 bytes of `keccak256(secret)`. The same
//! secret always yields the same salt, so a deployer can reproduce an
//! address on any chain without publishing the secret before deployment.

use alloy_primitives::{keccak256, FixedBytes, B256};

use crate::constants::{SALT_HASH_LENGTH, SALT_PADDING_LENGTH};
use crate::errors::DeployError;

/// Truncated 20-byte hash. Displays as `0x`-prefixed hex.
pub type Hash20 = FixedBytes<SALT_HASH_LENGTH>;

/// Derive the salt hash for `secret`.
pub fn derive_salt_hash(secret: &str) -> Result<Hash20, DeployError> {
    if secret.is_empty() {
        return Err(DeployError::InvalidSecret);
    }
    let digest = keccak256(secret.as_bytes());
    Ok(Hash20::from_slice(&digest[..SALT_HASH_LENGTH]))
}

/// Like [`derive_salt_hash`] for an optional secret; `None` is rejected.
pub fn derive_salt_hash_opt(secret: Option<&str>) -> Result<Hash20, DeployError> {
    derive_salt_hash(secret.ok_or(DeployError::InvalidSecret)?)
}

/// Widen a salt hash into the 32-byte CREATE2 salt (left zero-padded).
pub fn deployment_salt(salt_hash: Hash20) -> B256 {
    let mut salt = [0u8; 32];
    salt[SALT_PADDING_LENGTH..].copy_from_slice(salt_hash.as_slice());
    B256::from(salt)
}

/// Salt hash and deployment salt for `secret` in one step.
pub fn deployment_salt_for(secret: &str) -> Result<B256, DeployError> {
    derive_salt_hash(secret).map(deployment_salt)
}

//! Signing collaborators.
//!
//! The core only needs two capabilities from key custody: the signer's
//! address and a signature over a 32-byte digest. Hardware wallets or
//! remote signers plug in by implementing [`Signer`].

#[cfg(test)]
pub(crate) mod dev;
pub mod errors;
pub mod local;

pub use errors::SignerError;
pub use local::LocalSigner;

use alloy_primitives::{eip191_hash_message, Address, B256};
use async_trait::async_trait;

use crate::deployment::Verification;
use crate::errors::DeployError;

/// Produces signatures for deployment configs and approval messages.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Address the signatures recover to.
    fn address(&self) -> Address;

    /// Sign a raw 32-byte digest.
    async fn sign_digest(&self, digest: B256) -> Result<Verification, DeployError>;
}

/// Sign `message` under the personal-message (EIP-191) prefix.
pub async fn sign_personal(signer: &dyn Signer, message: B256) -> Result<Verification, DeployError> {
    signer.sign_digest(eip191_hash_message(message)).await
}

/// Recover the signer of a personal-message signature over `message`.
pub fn recover_personal(verification: &Verification, message: B256) -> Result<Address, DeployError> {
    verification.recover(eip191_hash_message(message))
}

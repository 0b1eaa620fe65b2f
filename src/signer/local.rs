use alloy_primitives::{Address, B256};
use alloy_signer::Signer as _;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use super::errors::SignerError;
use super::Signer;
use crate::deployment::Verification;
use crate::errors::DeployError;

/// [`Signer`] backed by an in-memory secp256k1 private key.
#[derive(Debug, Clone)]
pub struct LocalSigner {
    inner: PrivateKeySigner,
}

impl LocalSigner {
    /// Load a signer from a private key hex string (with or without `0x`).
    pub fn from_hex(private_key_hex: &str) -> Result<Self, SignerError> {
        let inner = private_key_hex
            .parse::<PrivateKeySigner>()
            .map_err(|_| SignerError::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// Generate a fresh random key.
    pub fn random() -> Self {
        Self { inner: PrivateKeySigner::random() }
    }
}

impl From<PrivateKeySigner> for LocalSigner {
    fn from(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Signer for LocalSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign_digest(&self, digest: B256) -> Result<Verification, DeployError> {
        let signature = self
            .inner
            .sign_hash(&digest)
            .await
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
        Ok(Verification::from(signature))
    }
}

use thiserror::Error;

use crate::errors::DeployError;

/// Errors that can occur while loading or using a signing key
#[derive(Debug, Error)]
pub enum SignerError {
    /// Signing operation failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Invalid private key format
    #[error("Invalid private key")]
    InvalidPrivateKey,
}

impl From<SignerError> for DeployError {
    fn from(err: SignerError) -> Self {
        DeployError::Signing(err.to_string())
    }
}

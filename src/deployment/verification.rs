use alloy_primitives::{Address, Signature, B256, U256};
use serde::{Deserialize, Serialize};

use crate::constants::SIGNATURE_LENGTH;
use crate::errors::DeployError;

/// ECDSA signature in the `(r, s, v)` layout Solidity `ecrecover` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verification {
    pub r: B256,
    pub s: B256,
    /// 27 or 28
    pub v: u8,
}

impl Verification {
    /// Build from raw parts; `v` may be given as 0/1 or 27/28.
    pub fn new(r: B256, s: B256, v: u8) -> Result<Self, DeployError> {
        let v = match v {
            0 | 1 => v + 27,
            27 | 28 => v,
            other => {
                return Err(DeployError::InvalidConfig(format!("invalid signature v value {other}")))
            }
        };
        Ok(Self { r, s, v })
    }

    /// y-parity of the signature.
    pub fn y_parity(&self) -> bool {
        self.v == 28
    }

    /// Convert to an alloy signature.
    pub fn to_signature(&self) -> Signature {
        Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            self.y_parity(),
        )
    }

    /// Recover the address that signed `digest`.
    pub fn recover(&self, digest: B256) -> Result<Address, DeployError> {
        self.to_signature()
            .recover_address_from_prehash(&digest)
            .map_err(|e| DeployError::InvalidConfig(format!("unrecoverable signature: {e}")))
    }

    /// Pack as `r ‖ s ‖ v` (65 bytes).
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    /// Parse a packed `r ‖ s ‖ v` signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeployError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(DeployError::InvalidConfig(format!(
                "invalid signature length: expected {SIGNATURE_LENGTH}, got {}",
                bytes.len()
            )));
        }
        Self::new(B256::from_slice(&bytes[..32]), B256::from_slice(&bytes[32..64]), bytes[64])
    }
}

impl From<Signature> for Verification {
    fn from(sig: Signature) -> Self {
        Self {
            r: B256::from(sig.r().to_be_bytes::<32>()),
            s: B256::from(sig.s().to_be_bytes::<32>()),
            v: 27 + sig.v() as u8,
        }
    }
}

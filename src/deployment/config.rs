use alloy_primitives::{keccak256, Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_CONTRACT_TYPE_LENGTH;
use crate::errors::DeployError;
use crate::network::ChainType;

/// Everything needed to deploy a holographable contract deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// Enforcer contract type, e.g. `HolographERC721`, right-aligned
    pub contract_type: B256,
    /// Chain-type enumerant of the chain the config was created for
    pub chain_type: u32,
    /// CREATE2 salt derived from the deployer secret
    pub salt: B256,
    /// Source (implementation) bytecode
    pub byte_code: Bytes,
    /// ABI-encoded initialisation arguments
    pub init_code: Bytes,
}

impl DeploymentConfig {
    /// Check the structural invariants of the config.
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.byte_code.is_empty() {
            return Err(DeployError::InvalidConfig("byteCode must not be empty".into()));
        }
        if self.init_code.is_empty() {
            return Err(DeployError::InvalidConfig("initCode must not be empty".into()));
        }
        if self.contract_type.is_zero() {
            return Err(DeployError::InvalidConfig("contractType must be set".into()));
        }
        ChainType::try_from(self.chain_type)?;
        Ok(())
    }

    /// Hash over every field.
    ///
    /// `keccak256(contractType ‖ chainType ‖ salt ‖ keccak256(byteCode) ‖ keccak256(initCode))`
    pub fn hash(&self) -> B256 {
        let mut packed = Vec::with_capacity(32 + 4 + 32 + 32 + 32);
        packed.extend_from_slice(self.contract_type.as_slice());
        packed.extend_from_slice(&self.chain_type.to_be_bytes());
        packed.extend_from_slice(self.salt.as_slice());
        packed.extend_from_slice(keccak256(&self.byte_code).as_slice());
        packed.extend_from_slice(keccak256(&self.init_code).as_slice());
        keccak256(packed)
    }

    /// Digest a deployer signs to authorise this config: `keccak256(hash ‖ signer)`.
    pub fn signing_hash(&self, signer: Address) -> B256 {
        let mut packed = [0u8; 52];
        packed[..32].copy_from_slice(self.hash().as_slice());
        packed[32..].copy_from_slice(signer.as_slice());
        keccak256(packed)
    }

    /// `keccak256(initCode ‖ byteCode)`, the CREATE2 init-code hash.
    pub fn init_code_hash(&self) -> B256 {
        let mut code = Vec::with_capacity(self.init_code.len() + self.byte_code.len());
        code.extend_from_slice(&self.init_code);
        code.extend_from_slice(&self.byte_code);
        keccak256(code)
    }
}

/// Right-align an ASCII contract-type name into a `bytes32`.
pub fn contract_type_from_name(name: &str) -> Result<B256, DeployError> {
    if name.is_empty() || name.len() > MAX_CONTRACT_TYPE_LENGTH || !name.is_ascii() {
        return Err(DeployError::InvalidConfig(format!(
            "contract type '{name}' must be 1-{MAX_CONTRACT_TYPE_LENGTH} ASCII characters"
        )));
    }
    let mut word = [0u8; 32];
    word[32 - name.len()..].copy_from_slice(name.as_bytes());
    Ok(B256::from(word))
}

/// Inverse of [`contract_type_from_name`]; `None` if the word is not ASCII.
pub fn contract_type_name(contract_type: B256) -> Option<String> {
    let start = contract_type.iter().position(|b| *b != 0)?;
    let bytes = &contract_type[start..];
    bytes.is_ascii().then(|| String::from_utf8_lossy(bytes).into_owned())
}

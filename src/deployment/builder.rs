use alloy_primitives::{Address, Bytes, B256};

use super::{DeploymentConfig, Verification};
use crate::errors::DeployError;
use crate::network::ChainType;
use crate::salt;
use crate::signer::{recover_personal, sign_personal, Signer};

/// Assembles a validated [`DeploymentConfig`].
#[derive(Debug, Clone, Default)]
pub struct DeploymentConfigBuilder {
    contract_type: Option<B256>,
    chain_type: Option<u32>,
    secret: Option<String>,
    byte_code: Option<Bytes>,
    init_code: Option<Bytes>,
}

impl DeploymentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contract_type(mut self, contract_type: B256) -> Self {
        self.contract_type = Some(contract_type);
        self
    }

    pub fn chain_type(mut self, chain_type: u32) -> Self {
        self.chain_type = Some(chain_type);
        self
    }

    /// Deployer secret the salt is derived from.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn byte_code(mut self, byte_code: impl Into<Bytes>) -> Self {
        self.byte_code = Some(byte_code.into());
        self
    }

    pub fn init_code(mut self, init_code: impl Into<Bytes>) -> Self {
        self.init_code = Some(init_code.into());
        self
    }

    /// Validate the inputs and derive the salt.
    pub fn build(self) -> Result<DeploymentConfig, DeployError> {
        let contract_type = self.contract_type.ok_or_else(|| missing("contractType"))?;
        let chain_type = self.chain_type.ok_or_else(|| missing("chainType"))?;
        ChainType::try_from(chain_type)?;
        let salt = salt::deployment_salt(salt::derive_salt_hash_opt(self.secret.as_deref())?);

        let config = DeploymentConfig {
            contract_type,
            chain_type,
            salt,
            byte_code: self.byte_code.ok_or_else(|| missing("byteCode"))?,
            init_code: self.init_code.ok_or_else(|| missing("initCode"))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from hex-encoded bytecode and init code.
    pub fn from_hex(
        contract_type: B256,
        chain_type: u32,
        secret: &str,
        byte_code_hex: &str,
        init_code_hex: &str,
    ) -> Result<DeploymentConfig, DeployError> {
        Self::new()
            .contract_type(contract_type)
            .chain_type(chain_type)
            .secret(secret)
            .byte_code(decode_hex("byteCode", byte_code_hex)?)
            .init_code(decode_hex("initCode", init_code_hex)?)
            .build()
    }
}

fn missing(field: &str) -> DeployError {
    DeployError::InvalidConfig(format!("{field} is required"))
}

/// Decode a `0x`-optional hex string into a non-empty byte sequence.
pub fn decode_hex(field: &str, value: &str) -> Result<Bytes, DeployError> {
    let trimmed = value.trim();
    let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(raw)
        .map_err(|e| DeployError::InvalidConfig(format!("{field} is not valid hex: {e}")))?;
    if bytes.is_empty() {
        return Err(DeployError::InvalidConfig(format!("{field} must not be empty")));
    }
    Ok(bytes.into())
}

/// Deterministic address of `config` when deployed by `deployer`.
///
/// Standard CREATE2 derivation:
/// `keccak256(0xff ‖ deployer ‖ salt ‖ keccak256(initCode ‖ byteCode))[12..]`.
/// Depends only on these inputs, so every chain sharing the deployer
/// address yields the same contract address.
pub fn compute_address(config: &DeploymentConfig, deployer: Address) -> Address {
    deployer.create2(config.salt, config.init_code_hash())
}

/// Sign `config` on behalf of `signer` (personal-message signature over
/// [`DeploymentConfig::signing_hash`]).
pub async fn sign_config(
    config: &DeploymentConfig,
    signer: &dyn Signer,
) -> Result<Verification, DeployError> {
    sign_personal(signer, config.signing_hash(signer.address())).await
}

/// Check that `verification` was produced by `signer` over `config`.
pub fn verify_config(
    config: &DeploymentConfig,
    signer: Address,
    verification: &Verification,
) -> Result<(), DeployError> {
    let recovered = recover_personal(verification, config.signing_hash(signer))?;
    if recovered != signer {
        return Err(DeployError::InvalidConfig(format!(
            "verification recovers to {recovered}, expected signer {signer}"
        )));
    }
    Ok(())
}

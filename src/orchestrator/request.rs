use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::bridge::abi::{deployHolographableContractCall, DeploymentConfigAbi, VerificationAbi};
use crate::bridge::BridgeMessage;
use crate::deployment::{DeploymentConfig, Verification};
use crate::errors::DeployError;
use crate::network::ChainId;
use crate::settings::serde_millis;

/// Per-destination parameters for a bridged deployment. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSettings {
    pub to_chain: ChainId,
    /// Value attached to the source-side `bridgeOut`
    #[serde(default)]
    pub value: U256,
    /// Gas limit for the destination-side `bridgeIn`
    pub gas_limit: u64,
    /// Gas price for the destination-side `bridgeIn`
    pub gas_price: U256,
}

impl BridgeSettings {
    pub fn new(to_chain: ChainId, value: U256, gas_limit: u64, gas_price: U256) -> Self {
        Self { to_chain, value, gas_limit, gas_price }
    }
}

/// A signed deployment fanned out to one or more chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub config: DeploymentConfig,
    pub verification: Verification,
    /// Approved deployer the verification recovers to
    pub signer: Address,
    /// Also deploy directly through the factory on the current chain
    #[serde(default)]
    pub deploy_on_current_chain: bool,
    #[serde(default)]
    pub bridge_settings: Vec<BridgeSettings>,
    /// Overrides the request timeout from the deploy settings
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_millis::option")]
    pub timeout: Option<Duration>,
}

impl DeploymentRequest {
    /// A request with no targets yet.
    pub fn new(config: DeploymentConfig, verification: Verification, signer: Address) -> Self {
        Self {
            config,
            verification,
            signer,
            deploy_on_current_chain: false,
            bridge_settings: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_direct_deploy(mut self, enabled: bool) -> Self {
        self.deploy_on_current_chain = enabled;
        self
    }

    pub fn with_bridge(mut self, settings: BridgeSettings) -> Self {
        self.bridge_settings.push(settings);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Every chain the request targets, ascending.
    ///
    /// Fails when a chain is named twice, including a bridged entry for the
    /// current chain alongside a direct deployment.
    pub fn targets(&self, current: ChainId) -> Result<Vec<ChainId>, DeployError> {
        let mut targets = BTreeSet::new();
        if self.deploy_on_current_chain {
            targets.insert(current);
        }
        for settings in &self.bridge_settings {
            if !targets.insert(settings.to_chain) {
                return Err(DeployError::InvalidConfig(format!(
                    "chain {} targeted more than once",
                    settings.to_chain
                )));
            }
        }
        if targets.is_empty() {
            return Err(DeployError::InvalidConfig("request has no target chains".into()));
        }
        Ok(targets.into_iter().collect())
    }

    /// Calldata for `HolographFactory.deployHolographableContract`.
    pub fn deploy_calldata(&self) -> Bytes {
        let call = deployHolographableContractCall {
            config: DeploymentConfigAbi {
                contractType: self.config.contract_type,
                chainType: self.config.chain_type,
                salt: self.config.salt,
                byteCode: self.config.byte_code.clone(),
                initCode: self.config.init_code.clone(),
            },
            signature: VerificationAbi {
                r: self.verification.r,
                s: self.verification.s,
                v: self.verification.v,
            },
            signer: self.signer,
        };
        call.abi_encode().into()
    }

    /// The bridge message carrying this deployment from `from` to `to`.
    pub fn bridge_message(&self, from: ChainId, to: ChainId) -> BridgeMessage {
        BridgeMessage::new(from, to, self.signer, self.deploy_calldata())
    }
}

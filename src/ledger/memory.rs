use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

use crate::approval;
use crate::bridge::{selectors, Applied, BridgeMessage, BridgeOutcome, Rejected};
use crate::chain::LedgerReader;
use crate::deployment::Verification;
use crate::errors::{ChainError, DeployError};
use crate::network::ChainId;

#[derive(Debug)]
struct LedgerState {
    approved: BTreeSet<Address>,
    nonce: U256,
    applied: HashSet<B256>,
    reachable: bool,
}

/// One chain's Genesis authority and bridge state, held in memory.
///
/// Approvals follow the on-chain rules: the signature must be built for the
/// current nonce, must recover to an already approved deployer, and every
/// accepted approval advances the nonce by one.
#[derive(Debug)]
pub struct MemoryLedger {
    chain_id: ChainId,
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            state: RwLock::new(LedgerState {
                approved: BTreeSet::new(),
                nonce: U256::ZERO,
                applied: HashSet::new(),
                reachable: true,
            }),
        }
    }

    /// Seed an approved deployer (genesis allocation).
    pub fn with_deployer(mut self, deployer: Address) -> Self {
        self.state.get_mut().approved.insert(deployer);
        self
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Simulate the node behind this ledger going offline or coming back.
    pub async fn set_reachable(&self, reachable: bool) {
        self.state.write().await.reachable = reachable;
    }

    /// Next expected approval nonce.
    pub async fn nonce(&self) -> U256 {
        self.state.read().await.nonce
    }

    /// Currently approved deployers, ascending.
    pub async fn approved_deployers(&self) -> Vec<Address> {
        self.state.read().await.approved.iter().copied().collect()
    }

    /// Apply an `approveDeployer` call.
    ///
    /// Returns the nonce expected by the next approval.
    pub async fn apply_approval(
        &self,
        nonce: U256,
        candidate: Address,
        approve: bool,
        signature: &Verification,
    ) -> Result<U256, DeployError> {
        let approver = approval::recover_approver(nonce, candidate, approve, signature)?;

        let mut state = self.state.write().await;
        if nonce != state.nonce {
            return Err(DeployError::NonceMismatch { expected: state.nonce, got: nonce });
        }
        if !state.approved.contains(&approver) {
            return Err(DeployError::UnauthorizedDeployer {
                deployer: approver,
                chain_id: self.chain_id,
            });
        }

        if approve {
            state.approved.insert(candidate);
        } else {
            state.approved.remove(&candidate);
        }
        state.nonce += U256::from(1);
        debug!(chain_id = %self.chain_id, %approver, %candidate, approve, nonce = %state.nonce, "approval applied");
        Ok(state.nonce)
    }

    /// Apply a `bridgeIn` for `message`; a message is only ever applied once.
    pub async fn apply_bridge_in(&self, message: &BridgeMessage) -> BridgeOutcome {
        let id = message.id();
        let mut state = self.state.write().await;
        if !state.applied.insert(id) {
            return Err(Rejected::AlreadyApplied(id));
        }
        debug!(chain_id = %self.chain_id, message_id = %id, from = %message.from_chain, "bridge message applied");
        Ok(Applied { selector: selectors::bridge_in(), data: Bytes::new() })
    }

    async fn reachable(&self) -> Result<(), ChainError> {
        if self.state.read().await.reachable {
            Ok(())
        } else {
            Err(ChainError::Unavailable(format!("ledger for chain {} offline", self.chain_id)))
        }
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn is_approved_deployer(&self, deployer: Address) -> Result<bool, ChainError> {
        self.reachable().await?;
        Ok(self.state.read().await.approved.contains(&deployer))
    }

    async fn current_approval_nonce(&self) -> Result<U256, ChainError> {
        self.reachable().await?;
        Ok(self.state.read().await.nonce)
    }

    async fn is_bridge_message_applied(&self, message_id: B256) -> Result<bool, ChainError> {
        self.reachable().await?;
        Ok(self.state.read().await.applied.contains(&message_id))
    }
}

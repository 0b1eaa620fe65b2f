use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::errors::{DeployError, FailureKind};
use crate::network::ChainId;

/// Per-chain lifecycle: `Pending → Submitted → {Confirmed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChainStatus {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

impl ChainStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

/// How a chain is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Route {
    /// Factory call on the current chain
    Direct,
    /// `bridgeOut` on the current chain, `bridgeIn` on the target
    Bridged,
}

/// Why a chain failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&DeployError> for ChainFailure {
    fn from(err: &DeployError) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }
}

/// Outcome slot for one target chain.
///
/// Written by exactly one task. Once the status is terminal every further
/// transition is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainOutcome {
    pub chain_id: ChainId,
    pub route: Route,
    pub status: ChainStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ChainFailure>,
    /// Source-side state already changed; an operator has to reconcile it
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_reconciliation: bool,
    #[serde(skip)]
    bridge_out_accepted: bool,
}

impl ChainOutcome {
    pub fn pending(chain_id: ChainId, route: Route) -> Self {
        Self {
            chain_id,
            route,
            status: ChainStatus::Pending,
            tx_hash: None,
            address: None,
            error: None,
            needs_reconciliation: false,
            bridge_out_accepted: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record a broadcast transaction. Returns `false` if the slot is terminal.
    pub fn submitted(&mut self, tx_hash: B256) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = ChainStatus::Submitted;
        self.tx_hash = Some(tx_hash);
        true
    }

    /// Mark the chain confirmed at `address`.
    pub fn confirm(&mut self, address: Address) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = ChainStatus::Confirmed;
        self.address = Some(address);
        true
    }

    /// Mark the chain failed with `err`.
    pub fn fail(&mut self, err: &DeployError) -> bool {
        self.fail_with(ChainFailure::from(err))
    }

    /// Mark the chain failed with `failure`.
    ///
    /// A chain whose `bridgeOut` was already accepted is flagged for
    /// reconciliation, whatever the failure.
    pub fn fail_with(&mut self, failure: ChainFailure) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = ChainStatus::Failed;
        self.error = Some(failure);
        self.needs_reconciliation = self.bridge_out_accepted;
        true
    }

    /// Record that the source-side `bridgeOut` went through.
    pub fn mark_bridge_out_accepted(&mut self) {
        if !self.is_terminal() {
            self.bridge_out_accepted = true;
        }
    }
}

/// Outcome of a multi-chain deployment, ordered by chain id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    /// Deterministic contract address shared by every chain
    pub address: Address,
    pub chains: Vec<ChainOutcome>,
}

impl DeploymentReport {
    pub fn new(address: Address, mut chains: Vec<ChainOutcome>) -> Self {
        chains.sort_by_key(|outcome| outcome.chain_id);
        Self { address, chains }
    }

    pub fn get(&self, chain_id: ChainId) -> Option<&ChainOutcome> {
        self.chains.iter().find(|outcome| outcome.chain_id == chain_id)
    }

    /// Every chain reached a terminal status.
    pub fn is_complete(&self) -> bool {
        self.chains.iter().all(ChainOutcome::is_terminal)
    }

    pub fn confirmed(&self) -> impl Iterator<Item = &ChainOutcome> {
        self.chains.iter().filter(|o| o.status == ChainStatus::Confirmed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ChainOutcome> {
        self.chains.iter().filter(|o| o.status == ChainStatus::Failed)
    }

    pub fn all_confirmed(&self) -> bool {
        self.chains.iter().all(|o| o.status == ChainStatus::Confirmed)
    }
}

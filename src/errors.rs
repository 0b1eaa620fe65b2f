use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::ChainId;

/// Errors raised by a Chain Client or Ledger Reader implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// Connection-level failure; the call may succeed if repeated.
    #[error("chain unavailable: {0}")]
    Unavailable(String),

    /// The node refused the request (bad nonce, underpriced, malformed tx...).
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Errors produced while deploying or bridging holographable contracts.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Malformed or missing request fields. The caller must fix the input.
    #[error("invalid deployment config: {0}")]
    InvalidConfig(String),

    /// Salt secret was empty.
    #[error("salt secret must not be empty")]
    InvalidSecret,

    /// The signer is not an approved deployer on the given chain.
    #[error("deployer {deployer} is not approved on chain {chain_id}")]
    UnauthorizedDeployer {
        /// Address that requested the deployment
        deployer: Address,
        /// Chain whose Genesis registry rejected it
        chain_id: ChainId,
    },

    /// The approval nonce used for a signature is no longer the expected one.
    #[error("approval nonce mismatch: expected {expected}, got {got}")]
    NonceMismatch {
        /// Nonce the Genesis registry expects next
        expected: U256,
        /// Nonce the signature was built for
        got: U256,
    },

    /// A `bridgeIn`/`bridgeOut` call did not return the expected magic value.
    #[error("bridge operation failed on chain {chain_id}: {reason}")]
    BridgeOperationFailed {
        /// Chain on which the call was made
        chain_id: ChainId,
        /// Human-readable rejection reason
        reason: String,
    },

    /// The transaction was still unconfirmed when the receipt policy ran out.
    #[error("timed out waiting for receipt of {tx_hash} after {attempts} attempts")]
    ReceiptTimeout {
        /// Transaction being tracked
        tx_hash: B256,
        /// Number of receipt polls performed
        attempts: u32,
    },

    /// The node does not know the transaction at all.
    #[error("transaction {tx_hash} not found")]
    ReceiptNotFound {
        /// Transaction being tracked
        tx_hash: B256,
    },

    /// Chain Client connection failure that outlived the retry budget.
    #[error("chain {chain_id} unavailable: {reason}")]
    ChainUnavailable {
        /// Chain that could not be reached
        chain_id: ChainId,
        /// Last transport error
        reason: String,
    },

    /// The chain rejected a submitted transaction.
    #[error("transaction rejected by chain {chain_id}: {reason}")]
    Rejected {
        /// Chain that rejected the transaction
        chain_id: ChainId,
        /// Reason reported by the node
        reason: String,
    },

    /// The transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted")]
    Reverted {
        /// Reverted transaction
        tx_hash: B256,
    },

    /// Signing a digest failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl DeployError {
    /// Attach a chain id to a collaborator error.
    pub fn from_chain(chain_id: ChainId, err: ChainError) -> Self {
        match err {
            ChainError::Unavailable(reason) => Self::ChainUnavailable { chain_id, reason },
            ChainError::Rejected(reason) => Self::Rejected { chain_id, reason },
        }
    }

    /// Whether the error is transient and the failed step may be attempted again.
    ///
    /// `NonceMismatch` is retryable exactly once by the approval flow after the
    /// nonce is refetched; the caller enforces that bound.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ChainUnavailable { .. }
                | Self::NonceMismatch { .. }
                | Self::ReceiptTimeout { .. }
        )
    }

    /// Whether the error invalidates the whole multi-chain request.
    pub fn aborts_request(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::InvalidSecret | Self::UnauthorizedDeployer { .. }
        )
    }

    /// Classification used in deployment reports.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidConfig(_) | Self::InvalidSecret => FailureKind::InvalidConfig,
            Self::UnauthorizedDeployer { .. } => FailureKind::Unauthorized,
            Self::NonceMismatch { .. } => FailureKind::NonceMismatch,
            Self::BridgeOperationFailed { .. } => FailureKind::BridgeOperationFailed,
            Self::ReceiptTimeout { .. } | Self::ReceiptNotFound { .. } => FailureKind::Timeout,
            Self::ChainUnavailable { .. } => FailureKind::ChainUnavailable,
            Self::Rejected { .. } => FailureKind::Rejected,
            Self::Reverted { .. } => FailureKind::Reverted,
            Self::Signing(_) => FailureKind::Signing,
        }
    }
}

/// Coarse failure category recorded per chain in a deployment report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    InvalidConfig,
    Unauthorized,
    NonceMismatch,
    BridgeOperationFailed,
    /// No receipt within the budget, or the node lost the transaction
    Timeout,
    ChainUnavailable,
    Rejected,
    Reverted,
    Signing,
}

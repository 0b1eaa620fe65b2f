//! Collaborator interfaces.
//!
//! The core never talks to a node directly. Transport, key custody and
//! state reads are reached through the traits below, one set per chain:
//!
//! ```text
//!   Orchestrator / ApprovalRegistry
//!     → ChainContract   (factory, bridge, genesis on one chain)
//!       → ChainClient   (submit / receipt / transaction lookup)
//!     → LedgerReader    (Genesis registry + bridge state reads)
//! ```

pub mod contract;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use contract::{retry_unavailable, transact_with_retry, ChainContract, ContractHandle};
pub use types::{Receipt, TxInfo, TxRequest};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::errors::ChainError;
use crate::network::ChainId;

/// Transaction submission and lookup on a single chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Chain id reported by the node.
    async fn chain_id(&self) -> Result<ChainId, ChainError>;

    /// Broadcast a transaction, returning its hash.
    async fn submit(&self, tx: TxRequest) -> Result<B256, ChainError>;

    /// Receipt of a mined transaction, `None` if not mined yet.
    async fn get_receipt(&self, tx_hash: B256) -> Result<Option<Receipt>, ChainError>;

    /// Transaction details, `None` if the node does not know the hash.
    async fn get_transaction(&self, tx_hash: B256) -> Result<Option<TxInfo>, ChainError>;
}

/// Read access to deployed protocol state on a single chain.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Whether the Genesis registry lists `deployer` as approved.
    async fn is_approved_deployer(&self, deployer: Address) -> Result<bool, ChainError>;

    /// Next nonce the Genesis registry expects for an approval signature.
    async fn current_approval_nonce(&self) -> Result<U256, ChainError>;

    /// Whether a bridge message with this id was already applied by `bridgeIn`.
    async fn is_bridge_message_applied(&self, _message_id: B256) -> Result<bool, ChainError> {
        Ok(false)
    }
}

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use super::{ChainClient, TxRequest};
use crate::errors::{ChainError, DeployError};
use crate::network::ChainId;
use crate::tracker::Backoff;

/// Narrow capability to transact with one contract on one chain.
///
/// Services hold one of these per protocol contract instead of a full
/// contract binding.
#[async_trait]
pub trait ChainContract: Send + Sync {
    /// Chain the contract lives on.
    fn chain_id(&self) -> ChainId;

    /// Contract address.
    fn address(&self) -> Address;

    /// Client used to reach the chain.
    fn client(&self) -> Arc<dyn ChainClient>;

    /// Broadcast a call to the contract and return the transaction hash.
    async fn transact(
        &self,
        calldata: Bytes,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
    ) -> Result<B256, ChainError>;
}

/// [`ChainContract`] backed by a [`ChainClient`].
#[derive(Clone)]
pub struct ContractHandle {
    chain_id: ChainId,
    address: Address,
    client: Arc<dyn ChainClient>,
}

impl ContractHandle {
    pub fn new(chain_id: ChainId, address: Address, client: Arc<dyn ChainClient>) -> Self {
        Self { chain_id, address, client }
    }

    /// Build the transaction request for a call without sending it.
    pub fn request(&self, calldata: Bytes, value: U256, gas_limit: u64, gas_price: U256) -> TxRequest {
        TxRequest { to: self.address, data: calldata, value, gas_limit, gas_price }
    }
}

impl std::fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHandle")
            .field("chain_id", &self.chain_id)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChainContract for ContractHandle {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    fn address(&self) -> Address {
        self.address
    }

    fn client(&self) -> Arc<dyn ChainClient> {
        self.client.clone()
    }

    async fn transact(
        &self,
        calldata: Bytes,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
    ) -> Result<B256, ChainError> {
        self.client.submit(self.request(calldata, value, gas_limit, gas_price)).await
    }
}

/// Run `op` until it succeeds, retrying `ChainError::Unavailable` with backoff.
///
/// `Rejected` errors are returned immediately; `Unavailable` is retried up to
/// `retries` extra times before being surfaced as `ChainUnavailable`.
pub async fn retry_unavailable<T, F, Fut>(
    chain_id: ChainId,
    operation: &'static str,
    retries: u32,
    mut backoff: Backoff,
    mut op: F,
) -> Result<T, DeployError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ChainError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(ChainError::Unavailable(reason)) if attempt < retries => {
                attempt += 1;
                let delay = backoff.next_delay();
                tracing::warn!(%chain_id, operation, attempt, ?delay, %reason, "chain call failed, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(DeployError::from_chain(chain_id, err)),
        }
    }
}

/// Submit through `contract` with [`retry_unavailable`].
pub async fn transact_with_retry(
    contract: &dyn ChainContract,
    calldata: Bytes,
    value: U256,
    gas_limit: u64,
    gas_price: U256,
    retries: u32,
    backoff: Backoff,
) -> Result<B256, DeployError> {
    retry_unavailable(contract.chain_id(), "submit", retries, backoff, move || {
        contract.transact(calldata.clone(), value, gas_limit, gas_price)
    })
    .await
}

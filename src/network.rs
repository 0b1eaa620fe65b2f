//! Explicit network selection.
//!
//! Every component receives a [`NetworkContext`] describing the chain it is
//! acting from and the endpoints of every chain it may reach. There is no
//! process-wide "current network".

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::chain::{ChainClient, ChainContract, ContractHandle, LedgerReader};
use crate::errors::DeployError;

/// EVM chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    /// Wrap a raw chain id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Narrow to the `uint32` used in bridge calldata.
    pub fn as_u32(self) -> Result<u32, DeployError> {
        u32::try_from(self.0).map_err(|_| {
            DeployError::InvalidConfig(format!("chain id {} does not fit in uint32", self.0))
        })
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chain-type enumerants accepted in a `DeploymentConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ChainType {
    Ethereum = 1,
    Bsc = 2,
    Avalanche = 3,
    Polygon = 4,
    Arbitrum = 6,
    Optimism = 7,
    Base = 8,
    Zora = 9,
}

impl ChainType {
    /// All supported chain types.
    pub const ALL: [ChainType; 8] = [
        ChainType::Ethereum,
        ChainType::Bsc,
        ChainType::Avalanche,
        ChainType::Polygon,
        ChainType::Arbitrum,
        ChainType::Optimism,
        ChainType::Base,
        ChainType::Zora,
    ];

    /// Numeric enumerant as stored in `DeploymentConfig.chainType`.
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Look up a chain type by its enumerant.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Mainnet EVM chain id for this chain type.
    pub const fn evm_chain_id(self) -> ChainId {
        ChainId::new(match self {
            ChainType::Ethereum => 1,
            ChainType::Bsc => 56,
            ChainType::Avalanche => 43_114,
            ChainType::Polygon => 137,
            ChainType::Arbitrum => 42_161,
            ChainType::Optimism => 10,
            ChainType::Base => 8_453,
            ChainType::Zora => 7_777_777,
        })
    }
}

impl TryFrom<u32> for ChainType {
    type Error = DeployError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::from_id(id)
            .ok_or_else(|| DeployError::InvalidConfig(format!("unsupported chain type {id}")))
    }
}

/// Collaborators scoped to a single chain.
#[derive(Clone)]
pub struct ChainEndpoint {
    /// Transaction submission and receipt lookup
    pub client: Arc<dyn ChainClient>,
    /// Read access to the chain's Genesis registry and bridge state
    pub ledger: Arc<dyn LedgerReader>,
}

impl ChainEndpoint {
    pub fn new(client: Arc<dyn ChainClient>, ledger: Arc<dyn LedgerReader>) -> Self {
        Self { client, ledger }
    }
}

impl fmt::Debug for ChainEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEndpoint").finish_non_exhaustive()
    }
}

/// The chain the caller acts from, plus every chain it can reach.
///
/// Holograph protocol contracts (factory, bridge, genesis) share one address
/// on every chain, which is what makes deterministic deployment possible.
#[derive(Debug, Clone)]
pub struct NetworkContext {
    current: ChainId,
    factory: Address,
    bridge: Address,
    genesis: Address,
    endpoints: BTreeMap<ChainId, ChainEndpoint>,
}

impl NetworkContext {
    /// Create a context acting from `current`.
    pub fn new(current: ChainId, factory: Address, bridge: Address, genesis: Address) -> Self {
        Self { current, factory, bridge, genesis, endpoints: BTreeMap::new() }
    }

    /// Register the collaborators for a chain.
    pub fn with_endpoint(mut self, chain_id: ChainId, endpoint: ChainEndpoint) -> Self {
        self.endpoints.insert(chain_id, endpoint);
        self
    }

    /// The chain requests originate from.
    pub fn current(&self) -> ChainId {
        self.current
    }

    /// Deployer (factory) contract address shared by every chain.
    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Bridge contract address shared by every chain.
    pub fn bridge(&self) -> Address {
        self.bridge
    }

    /// Genesis (deployer-approval authority) contract address.
    pub fn genesis(&self) -> Address {
        self.genesis
    }

    /// Whether the context has collaborators for `chain_id`.
    pub fn knows(&self, chain_id: ChainId) -> bool {
        self.endpoints.contains_key(&chain_id)
    }

    /// All registered chains, ascending.
    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.endpoints.keys().copied()
    }

    /// Collaborators for `chain_id`.
    pub fn endpoint(&self, chain_id: ChainId) -> Result<&ChainEndpoint, DeployError> {
        self.endpoints
            .get(&chain_id)
            .ok_or_else(|| DeployError::InvalidConfig(format!("unknown chain {chain_id}")))
    }

    /// Factory contract on `chain_id`.
    pub fn factory_on(&self, chain_id: ChainId) -> Result<Arc<dyn ChainContract>, DeployError> {
        self.contract_on(chain_id, self.factory)
    }

    /// Bridge contract on `chain_id`.
    pub fn bridge_on(&self, chain_id: ChainId) -> Result<Arc<dyn ChainContract>, DeployError> {
        self.contract_on(chain_id, self.bridge)
    }

    /// Genesis contract on `chain_id`.
    pub fn genesis_on(&self, chain_id: ChainId) -> Result<Arc<dyn ChainContract>, DeployError> {
        self.contract_on(chain_id, self.genesis)
    }

    fn contract_on(
        &self,
        chain_id: ChainId,
        address: Address,
    ) -> Result<Arc<dyn ChainContract>, DeployError> {
        let endpoint = self.endpoint(chain_id)?;
        Ok(Arc::new(ContractHandle::new(chain_id, address, endpoint.client.clone())))
    }
}

//! # holograph-deployer
//!
//! Deterministic cross-chain deployment of holographable contracts. A
//! deployment config is signed once by an approved deployer and lands at the
//! same address on every chain, either directly through the factory or
//! through a `bridgeOut`/`bridgeIn` round trip between bridge contracts.

pub mod approval;
pub mod bridge;
pub mod chain;
pub mod cli;
pub mod constants;
pub mod deployment;
pub mod errors;
pub mod ledger;
pub mod logging;
pub mod network;
pub mod orchestrator;
pub mod output;
pub mod salt;
pub mod settings;
pub mod signer;
pub mod tracker;

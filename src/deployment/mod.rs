//! Deterministic deployment configs.
//!
//! A [`DeploymentConfig`] is hashed and signed by an approved deployer; the
//! resulting [`Verification`] travels with the config to every target chain.
//! The target address only depends on the factory address, the salt and the
//! code, so it is identical on every chain.

pub mod builder;
pub mod config;
pub mod verification;

pub use builder::{compute_address, decode_hex, sign_config, verify_config, DeploymentConfigBuilder};
pub use config::{contract_type_from_name, contract_type_name, DeploymentConfig};
pub use verification::Verification;

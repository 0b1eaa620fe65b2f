use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use crate::network::ChainId;
use crate::orchestrator::BridgeSettings;

/// CLI arguments for the deployer
#[derive(Parser, Debug)]
#[command(name = "holograph-deployer", about = "Deterministic cross-chain contract deployer")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Level,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the salt hash and CREATE2 salt for a deployer secret
    Salt(SaltArgs),
    /// Build a deployment config, compute its address and optionally sign it
    Build(BuildArgs),
    /// Compute and check the deterministic address of a saved request
    Address(AddressArgs),
    /// Sign a deployer approval for the Genesis contract
    Approve(ApproveArgs),
    /// Show the effective deploy settings
    Settings(SettingsArgs),
    /// Render a saved deployment report
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct SaltArgs {
    /// Deployer secret
    #[arg(long, env = "DEPLOYER_SECRET")]
    pub secret: String,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Contract type name, e.g. HolographERC721
    #[arg(long)]
    pub contract_type: String,

    /// Chain-type enumerant (1 = Ethereum, 4 = Polygon, 8 = Base, ...)
    #[arg(long, default_value = "1")]
    pub chain_type: u32,

    /// Deployer secret the salt is derived from
    #[arg(long, env = "DEPLOYER_SECRET")]
    pub secret: String,

    /// Contract bytecode (hex)
    #[arg(long)]
    pub byte_code: String,

    /// ABI-encoded init arguments (hex)
    #[arg(long)]
    pub init_code: String,

    /// Factory (deployer contract) address shared by every chain
    #[arg(long)]
    pub factory: Address,

    /// Deployer private key (hex). When set, the config is signed and a
    /// deployment request is emitted.
    /// Can also be set via DEPLOYER_KEY environment variable.
    #[arg(long, env = "DEPLOYER_KEY", hide_env_values = true)]
    pub signer_key: Option<String>,

    /// Deploy directly on the current chain as well
    #[arg(long)]
    pub deploy_on_current_chain: bool,

    /// Bridge target as `chainId:value:gasLimit:gasPrice`. Repeatable.
    #[arg(long = "bridge", value_parser = parse_bridge_settings)]
    pub bridges: Vec<BridgeSettings>,

    /// Request timeout override in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Write the request JSON here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Deployment request JSON produced by `build`
    #[arg(long)]
    pub request: PathBuf,

    /// Factory (deployer contract) address
    #[arg(long)]
    pub factory: Address,
}

#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Current Genesis approval nonce
    #[arg(long)]
    pub nonce: U256,

    /// Address to approve or revoke
    #[arg(long)]
    pub candidate: Address,

    /// Revoke instead of approve
    #[arg(long)]
    pub revoke: bool,

    /// Approver private key (hex).
    /// Can also be set via DEPLOYER_KEY environment variable.
    #[arg(long, env = "DEPLOYER_KEY", hide_env_values = true)]
    pub signer_key: String,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// JSON settings file; missing fields keep their defaults
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Override the request timeout (milliseconds)
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,

    /// Override the number of submission retries
    #[arg(long)]
    pub submit_retries: Option<u32>,

    /// Override the receipt poll attempt budget
    #[arg(long)]
    pub max_receipt_attempts: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Deployment report JSON written by the orchestrator
    #[arg(long)]
    pub report: PathBuf,

    /// Exit with an error when any chain failed
    #[arg(long)]
    pub strict: bool,
}

/// Parse `chainId:value:gasLimit:gasPrice`.
pub fn parse_bridge_settings(raw: &str) -> Result<BridgeSettings, String> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [chain, value, gas_limit, gas_price] = parts.as_slice() else {
        return Err(format!("expected chainId:value:gasLimit:gasPrice, got `{raw}`"));
    };
    let chain = chain.parse::<u64>().map_err(|e| format!("invalid chain id `{chain}`: {e}"))?;
    let value = value.parse::<U256>().map_err(|e| format!("invalid value `{value}`: {e}"))?;
    let gas_limit =
        gas_limit.parse::<u64>().map_err(|e| format!("invalid gas limit `{gas_limit}`: {e}"))?;
    let gas_price =
        gas_price.parse::<U256>().map_err(|e| format!("invalid gas price `{gas_price}`: {e}"))?;
    Ok(BridgeSettings::new(ChainId::new(chain), value, gas_limit, gas_price))
}

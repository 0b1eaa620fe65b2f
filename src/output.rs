//! Colored console output for the deployer CLI.
//!
//! Color scheme: blue+bold headers, cyan values, green success,
//! red failures, yellow warnings, dimmed secondary text.

use alloy_primitives::{Address, B256, U256};
use colored::{ColoredString, Colorize};
use std::path::Path;
use std::time::Duration;

use crate::deployment::{contract_type_name, DeploymentConfig, Verification};
use crate::orchestrator::{ChainOutcome, ChainStatus, DeploymentReport};
use crate::salt::Hash20;
use crate::settings::DeploySettings;

// ── Helpers ────────────────────────────────────────────────────────

/// Format a Duration as a human-readable string.
///
/// - Sub-second values → `"500ms"`
/// - Integer seconds → `"1s"`
/// - Fractional seconds → `"1.5s"`
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms % 1000 == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Abbreviate a 32-byte hash as `0x1234…abcd`.
pub fn short_hash(hash: &B256) -> String {
    let full = format!("{hash}");
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

/// Fixed-width status label.
pub fn status_label(status: ChainStatus) -> &'static str {
    match status {
        ChainStatus::Pending => "PENDING  ",
        ChainStatus::Submitted => "SUBMITTED",
        ChainStatus::Confirmed => "CONFIRMED",
        ChainStatus::Failed => "FAILED   ",
    }
}

fn colored_status(status: ChainStatus) -> ColoredString {
    let label = status_label(status);
    match status {
        ChainStatus::Confirmed => label.green().bold(),
        ChainStatus::Failed => label.red().bold(),
        ChainStatus::Pending | ChainStatus::Submitted => label.yellow(),
    }
}

// ── Salt & Config ──────────────────────────────────────────────────

/// Print a derived salt hash and the CREATE2 salt built from it.
pub fn print_salt(salt_hash: &Hash20, salt: &B256) {
    println!();
    println!("{}", "=== Deployment Salt ===".blue().bold());
    println!("  {} {}", "Salt hash:".dimmed(), format!("{salt_hash}").cyan());
    println!("  {} {}", "Salt:     ".dimmed(), format!("{salt}").cyan());
}

/// Print a deployment config and its deterministic address.
pub fn print_config(config: &DeploymentConfig, factory: &Address, address: &Address) {
    let contract_type =
        contract_type_name(config.contract_type).unwrap_or_else(|| format!("{}", config.contract_type));
    println!();
    println!("{}", "=== Deployment Config ===".blue().bold());
    println!("  {} {}", "Contract type:".dimmed(), contract_type.cyan());
    println!("  {} {}", "Chain type:   ".dimmed(), config.chain_type.to_string().cyan());
    println!("  {} {}", "Salt:         ".dimmed(), format!("{}", config.salt).cyan());
    println!(
        "  {} {} bytes",
        "Byte code:    ".dimmed(),
        config.byte_code.len().to_string().cyan()
    );
    println!(
        "  {} {} bytes",
        "Init code:    ".dimmed(),
        config.init_code.len().to_string().cyan()
    );
    println!("  {} {}", "Config hash:  ".dimmed(), format!("{}", config.hash()).cyan());
    println!("  {} {}", "Factory:      ".dimmed(), format!("{factory}").cyan());
    println!("  {} {}", "Address:      ".dimmed(), format!("{address}").green().bold());
}

// ── Signatures ─────────────────────────────────────────────────────

/// Print a signature and the address it belongs to.
pub fn print_verification(signer: &Address, verification: &Verification) {
    println!();
    println!("{}", "Verification:".blue().bold());
    println!("  {} {}", "Signer:".dimmed(), format!("{signer}").cyan());
    println!("  {} {}", "r:     ".dimmed(), format!("{}", verification.r).cyan());
    println!("  {} {}", "s:     ".dimmed(), format!("{}", verification.s).cyan());
    println!("  {} {}", "v:     ".dimmed(), verification.v.to_string().cyan());
}

/// Print a prepared deployer approval.
pub fn print_approval(nonce: U256, candidate: &Address, approve: bool, approver: &Address) {
    println!();
    println!("{}", "=== Deployer Approval ===".blue().bold());
    println!("  {} {}", "Nonce:    ".dimmed(), nonce.to_string().cyan());
    println!("  {} {}", "Candidate:".dimmed(), format!("{candidate}").cyan());
    println!(
        "  {} {}",
        "Action:   ".dimmed(),
        if approve { "approve".green() } else { "revoke".yellow() }
    );
    println!("  {} {}", "Approver: ".dimmed(), format!("{approver}").cyan());
}

// ── Settings ───────────────────────────────────────────────────────

/// Print the effective deploy settings.
pub fn print_settings(settings: &DeploySettings) {
    let policy = &settings.receipt_policy;
    println!();
    println!("{}", "Deploy settings:".blue().bold());
    println!(
        "  {} {} → {} (x{}), {} attempts",
        "Receipt polling:".dimmed(),
        format_duration(policy.initial_interval).cyan(),
        format_duration(policy.max_interval).cyan(),
        policy.multiplier,
        policy.max_attempts.to_string().cyan()
    );
    if let Some(max) = policy.max_duration {
        println!("  {} {}", "Receipt budget: ".dimmed(), format_duration(max).cyan());
    }
    println!(
        "  {} {} (from {})",
        "Submit retries: ".dimmed(),
        settings.submit_retries.to_string().cyan(),
        format_duration(settings.submit_backoff).cyan()
    );
    println!("  {} {}", "Request timeout:".dimmed(), format_duration(settings.request_timeout).cyan());
    println!(
        "  {} {} gas @ {} wei",
        "Direct deploy:  ".dimmed(),
        settings.direct_gas_limit.to_string().cyan(),
        settings.direct_gas_price.to_string().cyan()
    );
}

// ── Reports ────────────────────────────────────────────────────────

fn print_outcome(outcome: &ChainOutcome) {
    let tx = outcome.tx_hash.as_ref().map(short_hash).unwrap_or_else(|| "-".into());
    println!(
        "  {} {:>10} {} {}",
        colored_status(outcome.status),
        outcome.chain_id.to_string().cyan(),
        format!("{:?}", outcome.route).to_lowercase().dimmed(),
        tx.dimmed(),
    );
    if let Some(error) = &outcome.error {
        println!("      {} {}", format!("{:?}", error.kind).red(), error.message);
    }
    if outcome.needs_reconciliation {
        println!("      {}", "bridgeOut already emitted on the source chain; reconcile manually".yellow());
    }
}

/// Print a multi-chain deployment report.
pub fn print_report(report: &DeploymentReport) {
    println!();
    println!("{}", "=== Deployment Report ===".blue().bold());
    println!("  {} {}", "Address:".dimmed(), format!("{}", report.address).green().bold());
    for outcome in &report.chains {
        print_outcome(outcome);
    }
    let failed = report.failed().count();
    if failed == 0 {
        println!("  {} all {} chains confirmed", "OK".green().bold(), report.chains.len());
    } else {
        println!(
            "  {} {} of {} chains failed",
            "WARN".yellow().bold(),
            failed.to_string().yellow(),
            report.chains.len()
        );
    }
}

// ── Files & Info ───────────────────────────────────────────────────

/// Print that a file was written.
pub fn print_saved(path: &Path) {
    println!("  {} Saved {}", "OK".green().bold(), path.display().to_string().cyan());
}

/// Print a generic informational message.
pub fn print_info(msg: &str) {
    println!("  {} {}", "INFO".blue().bold(), msg);
}

// ── Tests ───────────────────────────────────────────────────────────

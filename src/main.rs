use holograph_deployer::approval::{recover_approver, DeployerApprovalRegistry};
use holograph_deployer::cli::{
    AddressArgs, ApproveArgs, BuildArgs, Cli, Command, ReportArgs, SaltArgs, SettingsArgs,
};
use holograph_deployer::deployment::{
    compute_address, contract_type_from_name, sign_config, verify_config, DeploymentConfigBuilder,
};
use holograph_deployer::orchestrator::{DeploymentReport, DeploymentRequest};
use holograph_deployer::settings::DeploySettings;
use holograph_deployer::signer::{LocalSigner, Signer};
use holograph_deployer::{logging, output, salt};

use clap::Parser;
use eyre::WrapErr;
use std::time::Duration;

/// Main entry point for the deployer CLI
#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_level, cli.log_json)?;

    match cli.command {
        Command::Salt(args) => run_salt(args),
        Command::Build(args) => run_build(args).await,
        Command::Address(args) => run_address(args),
        Command::Approve(args) => run_approve(args).await,
        Command::Settings(args) => run_settings(args),
        Command::Report(args) => run_report(args),
    }
}

fn run_salt(args: SaltArgs) -> eyre::Result<()> {
    let salt_hash = salt::derive_salt_hash(&args.secret)?;
    output::print_salt(&salt_hash, &salt::deployment_salt(salt_hash));
    Ok(())
}

async fn run_build(args: BuildArgs) -> eyre::Result<()> {
    let contract_type = contract_type_from_name(&args.contract_type)?;
    let config = DeploymentConfigBuilder::from_hex(
        contract_type,
        args.chain_type,
        &args.secret,
        &args.byte_code,
        &args.init_code,
    )?;
    let address = compute_address(&config, args.factory);
    output::print_config(&config, &args.factory, &address);

    let Some(key) = args.signer_key else {
        output::print_info("No signer key given; pass --signer-key or DEPLOYER_KEY to emit a request");
        return Ok(());
    };
    let signer = LocalSigner::from_hex(&key)?;
    let verification = sign_config(&config, &signer).await?;
    output::print_verification(&signer.address(), &verification);

    let mut request = DeploymentRequest::new(config, verification, signer.address())
        .with_direct_deploy(args.deploy_on_current_chain);
    for settings in args.bridges {
        request = request.with_bridge(settings);
    }
    if let Some(ms) = args.timeout_ms {
        request = request.with_timeout(Duration::from_millis(ms));
    }

    let json = serde_json::to_string_pretty(&request)?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, json)
                .wrap_err_with(|| format!("Failed to write request to {}", path.display()))?;
            output::print_saved(&path);
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_address(args: AddressArgs) -> eyre::Result<()> {
    let raw = std::fs::read_to_string(&args.request)
        .wrap_err_with(|| format!("Failed to read request {}", args.request.display()))?;
    let request: DeploymentRequest = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Failed to parse request {}", args.request.display()))?;

    request.config.validate()?;
    verify_config(&request.config, request.signer, &request.verification)?;

    let address = compute_address(&request.config, args.factory);
    output::print_config(&request.config, &args.factory, &address);
    output::print_verification(&request.signer, &request.verification);
    Ok(())
}

async fn run_approve(args: ApproveArgs) -> eyre::Result<()> {
    let signer = LocalSigner::from_hex(&args.signer_key)?;
    let approve = !args.revoke;
    let signature =
        DeployerApprovalRegistry::build_approval_signature(args.nonce, args.candidate, approve, &signer)
            .await?;
    let approver = recover_approver(args.nonce, args.candidate, approve, &signature)?;

    output::print_approval(args.nonce, &args.candidate, approve, &approver);
    output::print_verification(&signer.address(), &signature);
    let calldata = DeployerApprovalRegistry::approval_calldata(args.nonce, args.candidate, approve, &signature);
    println!("0x{}", hex::encode(&calldata));
    Ok(())
}

fn run_settings(args: SettingsArgs) -> eyre::Result<()> {
    let mut settings = match &args.settings {
        Some(path) => DeploySettings::from_file(path)?,
        None => DeploySettings::default(),
    };
    if let Some(ms) = args.request_timeout_ms {
        settings.request_timeout = Duration::from_millis(ms);
    }
    if let Some(retries) = args.submit_retries {
        settings.submit_retries = retries;
    }
    if let Some(attempts) = args.max_receipt_attempts {
        settings.receipt_policy.max_attempts = attempts;
    }

    output::print_settings(&settings);
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn run_report(args: ReportArgs) -> eyre::Result<()> {
    let raw = std::fs::read_to_string(&args.report)
        .wrap_err_with(|| format!("Failed to read report {}", args.report.display()))?;
    let report: DeploymentReport = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Failed to parse report {}", args.report.display()))?;

    output::print_report(&report);
    let failed = report.failed().count();
    if args.strict && failed > 0 {
        eyre::bail!("{failed} of {} chains failed", report.chains.len());
    }
    Ok(())
}

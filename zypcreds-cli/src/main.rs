//! Developer CLI for the ZypCreds verification service.
//!
//! Credentials are read from `--account-id`/`--secret-key` or from the
//! `ZYPCREDS_ACCOUNT_ID`/`ZYPCREDS_SECRET_KEY` environment variables. Set
//! `RUST_LOG=zypcreds_core=debug` to see each outgoing request.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use zypcreds_core::ZypCredsClient;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    init_tracing()?;

    let cli = cli::Cli::parse();
    let config = cli.connection.client_config();
    tracing::debug!(?config, "starting");

    let client = ZypCredsClient::new(config)?;
    commands::run(&client, cli.command, cli.raw).await
}

/// Logs to stderr, filtered by `RUST_LOG`. Records emitted through the `log`
/// facade by `zypcreds-core` are forwarded as well.
fn init_tracing() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))
}

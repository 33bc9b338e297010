//! CRSet issuer entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use issuer_runtime::{load_config, log_filter_directive, Cli, IssuerContainer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging first so configuration warnings are visible;
    // RUST_LOG wins over CRSET_LOG_LEVEL. Output goes to stderr so stdout
    // stays machine readable.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_filter_directive(|name| std::env::var(name).ok()))
            .context("Invalid CRSET_LOG_LEVEL")?,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let mut config = load_config();
    if let Some(url) = cli.rpc_url.clone() {
        config.chain.rpc_url = url;
    }

    config
        .validate_for_production()
        .context("Invalid configuration")?;

    let container = IssuerContainer::build(&config).context("Failed to start issuer")?;
    info!(command = ?cli.command, "Running command");

    let mut stdout = std::io::stdout();
    cli.command.execute(&container, &mut stdout).await
}

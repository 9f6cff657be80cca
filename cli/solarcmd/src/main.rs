//! solarcmd
//!
//! Command-line front end for the SWIS client: IPAM address management,
//! subnet lookup, raw SWQL queries and NCM node removal. Results are printed
//! as JSON on stdout; logs and errors go to stderr.

mod cli;
mod commands;
mod error;
mod settings;

use clap::Parser;
use swis_client::RequestContext;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.debug.as_deref());

    if let Command::Version = cli.command {
        println!("{}", commands::version());
        return Ok(());
    }

    let settings = Settings::load(&cli.global)?;
    debug!(server = %settings.server, insecure = settings.insecure, "resolved settings");

    let client = settings.connect()?;
    let output = commands::run(&client, &RequestContext::background(), &cli.command).await?;

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

/// `--debug`/`ORION_DEBUG` wins over `RUST_LOG`; the default is warnings only
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! gridgate CLI - PJM Markets Gateway hourly market-results query tool.

use anyhow::{Context, Result, bail};
use clap::Parser;
use gridgate_lib::prelude::*;
use std::time::Duration;

mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "gridgate")]
#[command(about = "Query PJM Markets Gateway hourly market results", long_about = None)]
#[command(version)]
struct Cli {
    /// Query the PJM training sandbox instead of production
    #[arg(long)]
    sandbox: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Per-exchange timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Skip TLS certificate verification (debugging only)
    #[arg(long)]
    insecure: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Fail on absent credentials before touching the network.
    let credentials = Credentials::from_env()?;

    let environment = if cli.sandbox {
        Environment::Sandbox
    } else {
        Environment::Production
    };
    let client = GatewayClient::new(ClientConfig {
        environment,
        timeout: Duration::from_secs(cli.timeout),
        accept_invalid_certs: cli.insecure,
        ..Default::default()
    })
    .context("failed to build HTTP client")?;

    // Without a session token no query can proceed; authentication
    // failure aborts the whole run.
    let token = authenticate(&client, &credentials)
        .await
        .context("authentication against PJM single sign-on failed")?;

    let outcomes = run_all_windows(&client, &token).await;
    display::write_outcomes(&outcomes, cli.format)?;

    let failed = outcomes.iter().filter(|outcome| outcome.failed()).count();
    if failed > 0 {
        bail!("{failed} of {} queries failed", outcomes.len());
    }
    Ok(())
}

/// Initializes stderr logging from the verbosity flags, honoring
/// `RUST_LOG` when set.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "gridgate={level},gridgate_fetch={level},gridgate_xml={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! termon: a terminal dashboard for CPU, memory and core topology.
//!
//! Run with:  `termon [samples [tdelay]] [--memory] [--cpu] [--cores]`
//! Logs go to stderr; `RUST_LOG=debug termon 2>termon.log` traces every tick.

use anyhow::{Context, Result};
use std::process::ExitCode;
use std::time::Duration;
use termon_config::{CliArgs, Command, USAGE};
use termon_runtime::RunSummary;
use tracing_subscriber::EnvFilter;

/// How long a finished run waits for sampler threads still stuck in a read.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() -> ExitCode {
    // RUST_LOG controls verbosity. Defaults to warn: the dashboard owns stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = match termon_config::parse_os(std::env::args_os().skip(1)) {
        Ok(Command::Run(cli)) => cli,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {e}.");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: cannot start the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(run(cli)) {
        Ok(summary) => {
            tracing::debug!(?summary, "termon finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    };

    // A timed-out sampler may still be blocked in a read; do not wait on it.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    code
}

async fn run(cli: CliArgs) -> Result<RunSummary> {
    tracing::info!("termon v{} starting", env!("CARGO_PKG_VERSION"));

    let path = termon_config::default_path();
    let mut config = termon_config::load(&path)
        .with_context(|| format!("loading config from '{}'", path.display()))?;
    cli.apply(&mut config);

    Ok(termon_runtime::run(config).await?)
}

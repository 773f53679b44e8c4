use branch_sweep::app::{self, RunOptions};
use branch_sweep::config::CleanupConfig;
use branch_sweep::github::GitHubConnector;
use branch_sweep::prompt::StdinConfirmer;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

/// Delete obsolete branches from a GitHub repository
#[derive(Parser)]
#[command(name = "branch-sweep")]
#[command(about = "Delete a curated list of obsolete branches from a GitHub repository", long_about = None)]
#[command(version)]
struct Cli {
    /// Only report what would be deleted
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Path to a TOML settings file (default: ./branch-sweep.toml if present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn,branch_sweep=info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,reqwest=debug",
    };
    let filter =
        EnvFilter::try_from_env("BRANCH_SWEEP_LOG").unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("branch-sweep started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CleanupConfig::load(cli.config.as_deref())?;

    let options = RunOptions {
        dry_run: cli.dry_run,
    };
    app::run(
        &config,
        &options,
        |key| std::env::var(key).ok(),
        &GitHubConnector,
        Arc::new(StdinConfirmer::new()),
        std::io::stdout(),
    )
    .await?;
    Ok(())
}

//! Run orchestration: token check, connection, cleanup

use crate::config::{resolve_token, CleanupConfig};
use crate::error::Result;
use crate::github::HostConnector;
use crate::prompt::Confirmer;
use crate::runner::{CleanupRunner, CleanupSummary};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Options parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
}

/// Resolve the token through `env`, connect, and run the cleanup.
///
/// The token is checked before the connector is touched, so a missing token
/// never results in network traffic.
pub async fn run<E, W>(
    config: &CleanupConfig,
    options: &RunOptions,
    env: E,
    connector: &dyn HostConnector,
    confirmer: Arc<dyn Confirmer>,
    mut out: W,
) -> Result<CleanupSummary>
where
    E: Fn(&str) -> Option<String>,
    W: Write,
{
    let token = resolve_token(env)?;
    debug!("Token found, connecting to {}", config.repo_id());

    if options.dry_run {
        writeln!(out, "Running in DRY RUN mode - no branches will be deleted.")?;
        writeln!(out)?;
    }

    let host = connector.connect(&token, config)?;
    let mut runner = CleanupRunner::new(host, confirmer, config, options.dry_run, out);
    let summary = runner.run().await?;

    info!(
        "Cleanup finished: {:?}, {} deleted, {} failed",
        summary.outcome, summary.deleted, summary.failed
    );
    Ok(summary)
}

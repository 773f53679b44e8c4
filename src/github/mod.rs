//! Repository host abstraction
//!
//! Provides a trait-based seam over the GitHub REST API so the cleanup runner
//! can be exercised without network access.

pub mod client;

pub use client::GitHubClient;

use crate::config::{CleanupConfig, RepoId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Operations the cleanup needs from a repository host
#[async_trait]
pub trait BranchHost: Send + Sync {
    /// Resolve the repository and return its canonical `owner/name`
    async fn repository(&self) -> Result<String>;

    /// List every branch name, in the order the host returns them
    async fn list_branches(&self) -> Result<Vec<String>>;

    /// Delete the branch reference `heads/{name}`
    async fn delete_branch(&self, name: &str) -> Result<()>;
}

/// Builds a host once a token is available
pub trait HostConnector: Send + Sync {
    fn connect(&self, token: &str, config: &CleanupConfig) -> Result<Arc<dyn BranchHost>>;
}

/// Connects to the GitHub REST API
#[derive(Debug, Default, Clone, Copy)]
pub struct GitHubConnector;

impl HostConnector for GitHubConnector {
    fn connect(&self, token: &str, config: &CleanupConfig) -> Result<Arc<dyn BranchHost>> {
        let repo: RepoId = config.repo_id();
        tracing::debug!("Connecting to {} for {}", config.api_url, repo);
        let client = GitHubClient::new(&config.api_url, token, repo)?;
        Ok(Arc::new(client))
    }
}

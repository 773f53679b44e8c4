//! Cleanup settings
//!
//! Settings start from the built-in curated lists, are optionally replaced by a
//! TOML file, and are finally adjusted by environment variables.

use crate::error::{CleanupError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;

/// Environment variable holding the personal access token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
/// Environment variable overriding the REST API base URL.
pub const API_URL_ENV_VAR: &str = "GITHUB_API_URL";
/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "branch-sweep.toml";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Owner and name of the repository being cleaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Web page listing the repository's branches.
    pub fn branches_url(&self) -> String {
        format!("https://github.com/{}/{}/branches", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub owner: String,
    pub repo: String,
    pub api_url: String,
    /// Pause between deletion requests, in milliseconds.
    pub delay_ms: u64,
    pub keep: Vec<String>,
    pub delete: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            owner: defaults::REPO_OWNER.to_string(),
            repo: defaults::REPO_NAME.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
            keep: defaults::BRANCHES_TO_KEEP
                .iter()
                .map(|s| s.to_string())
                .collect(),
            delete: defaults::OBSOLETE_BRANCHES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CleanupConfig {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CleanupConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CleanupError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve settings for a run: an explicit path must exist, otherwise the
    /// default file is used when present, otherwise the built-in lists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!("Loading settings from {}", default_path.display());
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!("No settings file found, using built-in branch lists");
                    Self::default()
                }
            }
        };
        config.merge_env_vars();
        Ok(config)
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(API_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.api_url = api_url.trim().trim_end_matches('/').to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() || self.repo.trim().is_empty() {
            return Err(CleanupError::Config(
                "Repository owner and name must not be empty".to_string(),
            ));
        }
        if let Some(blank) = self.delete.iter().find(|b| b.trim().is_empty()) {
            return Err(CleanupError::Config(format!(
                "Delete list contains an empty branch name: {blank:?}"
            )));
        }
        Ok(())
    }

    pub fn repo_id(&self) -> RepoId {
        RepoId::new(&self.owner, &self.repo)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Read the access token through `lookup`. Absent and blank values are both
/// configuration errors.
pub fn resolve_token<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(TOKEN_ENV_VAR) {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(CleanupError::Config(missing_token_message())),
    }
}

fn missing_token_message() -> String {
    format!(
        "{TOKEN_ENV_VAR} environment variable is not set.\n\n\
         Please set your GitHub personal access token:\n  \
         export {TOKEN_ENV_VAR}=your_token_here\n\n\
         To create a token, visit:\n  \
         https://github.com/settings/tokens\n  \
         Required scopes: repo (Full control of private repositories)"
    )
}

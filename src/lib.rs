//! # branch-sweep
//!
//! Deletes a curated list of obsolete branches from a GitHub repository.
//!
//! ## Usage
//!
//! ```bash
//! GITHUB_TOKEN=... branch-sweep [--dry-run] [-c branch-sweep.toml]
//! ```
//!
//! ## Modules
//!
//! - `app` - Run orchestration: token check, connection, cleanup
//! - `config` - Repository identity, keep/delete lists, throttle and token lookup
//! - `error` - Error taxonomy shared by every layer
//! - `github` - `BranchHost` abstraction and the REST API client
//! - `plan` - Pure comparison of the configured lists against remote branches
//! - `prompt` - Operator confirmation
//! - `runner` - Report, confirm, delete and summarise
//! - `testing` - Mock host, connector and confirmer
pub mod app;
pub mod config;
pub mod error;
pub mod github;
pub mod plan;
pub mod prompt;
pub mod runner;

pub mod testing;

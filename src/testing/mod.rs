//! Test doubles for the host, connector and confirmation seams
//!
//! Used by unit tests and the integration tests under `tests/`.

use crate::config::CleanupConfig;
use crate::error::{CleanupError, Result};
use crate::github::{BranchHost, HostConnector};
use crate::prompt::{is_affirmative, Confirmer};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory host with scripted failures and call tracking
pub struct MockBranchHost {
    full_name: String,
    branches: Mutex<Vec<String>>,
    repository_error: Mutex<Option<CleanupError>>,
    listing_error: Mutex<Option<CleanupError>>,
    delete_errors: Mutex<HashMap<String, CleanupError>>,
    deleted: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockBranchHost {
    pub fn with_branches(branches: &[&str]) -> Self {
        Self {
            full_name: "acme/widgets".to_string(),
            branches: Mutex::new(branches.iter().map(|s| s.to_string()).collect()),
            repository_error: Mutex::new(None),
            listing_error: Mutex::new(None),
            delete_errors: Mutex::new(HashMap::new()),
            deleted: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn named(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    /// Fail repository resolution once with `error`
    pub fn failing_repository(self, error: CleanupError) -> Self {
        *self.repository_error.lock().unwrap() = Some(error);
        self
    }

    /// Fail branch listing once with `error`
    pub fn failing_listing(self, error: CleanupError) -> Self {
        *self.listing_error.lock().unwrap() = Some(error);
        self
    }

    /// Fail the deletion of `branch` with `error`
    pub fn failing_on(self, branch: &str, error: CleanupError) -> Self {
        self.delete_errors
            .lock()
            .unwrap()
            .insert(branch.to_string(), error);
        self
    }

    /// Branches successfully deleted, in call order
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> Vec<String> {
        self.branches.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BranchHost for MockBranchHost {
    async fn repository(&self) -> Result<String> {
        match self.repository_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.full_name.clone()),
        }
    }

    async fn list_branches(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.listing_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.branches.lock().unwrap().clone())
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.delete_errors.lock().unwrap().remove(name) {
            return Err(error);
        }

        let mut branches = self.branches.lock().unwrap();
        match branches.iter().position(|b| b == name) {
            Some(index) => {
                branches.remove(index);
                self.deleted.lock().unwrap().push(name.to_string());
                Ok(())
            }
            None => Err(CleanupError::Api {
                status: 422,
                message: "Reference does not exist".to_string(),
            }),
        }
    }
}

/// Connector handing out a prepared host and counting connections
pub struct MockConnector {
    host: Arc<MockBranchHost>,
    connects: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(host: Arc<MockBranchHost>) -> Self {
        Self {
            host,
            connects: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Tokens passed to `connect`, in call order
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

impl HostConnector for MockConnector {
    fn connect(&self, token: &str, _config: &CleanupConfig) -> Result<Arc<dyn BranchHost>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());
        Ok(self.host.clone())
    }
}

/// Confirmer that replays a fixed answer
pub struct ScriptedConfirmer {
    answer: String,
    prompts: AtomicUsize,
}

impl ScriptedConfirmer {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, _message: &str) -> anyhow::Result<bool> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(is_affirmative(&self.answer))
    }
}

//! Deletion planning
//!
//! Pure functions that compare the configured lists against the branches the
//! host actually has.

use std::collections::HashSet;

/// Partition of the delete list against the remote branch set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    /// Listed for deletion and present remotely, in delete-list order
    pub to_delete: Vec<String>,
    /// Listed for deletion but absent remotely
    pub already_gone: Vec<String>,
    /// Listed for deletion and also in the keep list. Reported, not excluded.
    pub conflicts: Vec<String>,
}

impl CleanupPlan {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
    }
}

/// Whether a keep-list branch exists remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepStatus {
    pub name: String,
    pub present: bool,
}

pub fn compute_plan(delete_list: &[String], remote_branches: &[String]) -> CleanupPlan {
    let remote: HashSet<&str> = remote_branches.iter().map(String::as_str).collect();
    let (to_delete, already_gone): (Vec<String>, Vec<String>) = delete_list
        .iter()
        .cloned()
        .partition(|name| remote.contains(name.as_str()));

    CleanupPlan {
        to_delete,
        already_gone,
        conflicts: Vec::new(),
    }
}

/// Like [`compute_plan`], additionally recording delete-list entries that are
/// also in the keep list.
pub fn compute_plan_with_keep(
    delete_list: &[String],
    keep_list: &[String],
    remote_branches: &[String],
) -> CleanupPlan {
    let keep: HashSet<&str> = keep_list.iter().map(String::as_str).collect();
    let mut plan = compute_plan(delete_list, remote_branches);
    plan.conflicts = delete_list
        .iter()
        .filter(|name| keep.contains(name.as_str()))
        .cloned()
        .collect();
    plan
}

pub fn keep_status(keep_list: &[String], remote_branches: &[String]) -> Vec<KeepStatus> {
    let remote: HashSet<&str> = remote_branches.iter().map(String::as_str).collect();
    keep_list
        .iter()
        .map(|name| KeepStatus {
            name: name.clone(),
            present: remote.contains(name.as_str()),
        })
        .collect()
}

//! Branch cleanup runner
//!
//! Lists the remote branches, reports the plan, asks for confirmation and
//! deletes branches one at a time with a fixed pause between requests.

use crate::config::{CleanupConfig, RepoId};
use crate::error::{CleanupError, Result};
use crate::github::BranchHost;
use crate::plan::{compute_plan_with_keep, keep_status, CleanupPlan};
use crate::prompt::Confirmer;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const RULE_WIDTH: usize = 60;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Report only, nothing deleted
    DryRun,
    /// Operator declined the confirmation
    Cancelled,
    /// No listed branch exists remotely
    NothingToDelete,
    /// Deletions were attempted
    Completed,
}

#[derive(Debug)]
pub struct CleanupSummary {
    pub outcome: RunOutcome,
    pub plan: CleanupPlan,
    pub deleted: usize,
    pub failed: usize,
    /// One `CleanupError::Deletion` per failed branch
    pub failures: Vec<CleanupError>,
}

impl CleanupSummary {
    fn new(outcome: RunOutcome, plan: CleanupPlan) -> Self {
        Self {
            outcome,
            plan,
            deleted: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.deleted + self.failed
    }
}

/// Runs one cleanup against a single host
pub struct CleanupRunner<W: Write> {
    host: Arc<dyn BranchHost>,
    confirmer: Arc<dyn Confirmer>,
    repo: RepoId,
    keep: Vec<String>,
    delete: Vec<String>,
    delay: Duration,
    dry_run: bool,
    out: W,
}

impl<W: Write> CleanupRunner<W> {
    pub fn new(
        host: Arc<dyn BranchHost>,
        confirmer: Arc<dyn Confirmer>,
        config: &CleanupConfig,
        dry_run: bool,
        out: W,
    ) -> Self {
        Self {
            host,
            confirmer,
            repo: config.repo_id(),
            keep: config.keep.clone(),
            delete: config.delete.clone(),
            delay: config.delay(),
            dry_run,
            out,
        }
    }

    /// Override the pause between deletions.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Errors returned here are fatal. Per-branch failures are counted in the
    /// summary instead.
    pub async fn run(&mut self) -> Result<CleanupSummary> {
        self.banner("Obsolete Branch Cleanup")?;
        writeln!(self.out)?;

        let full_name = self.host.repository().await?;
        writeln!(self.out, "Repository: {full_name}")?;
        writeln!(self.out)?;

        let remote = self.list_remote_branches().await?;
        writeln!(self.out, "Total branches in repository: {}", remote.len())?;
        writeln!(self.out)?;

        self.report_keep_list(&remote)?;

        let plan = compute_plan_with_keep(&self.delete, &self.keep, &remote);
        self.report_plan(&plan)?;

        if self.dry_run {
            writeln!(self.out)?;
            writeln!(self.out, "DRY RUN - No branches were actually deleted.")?;
            info!("Dry run: {} branch(es) would be deleted", plan.to_delete.len());
            return Ok(CleanupSummary::new(RunOutcome::DryRun, plan));
        }

        if plan.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "Nothing to delete.")?;
            return Ok(CleanupSummary::new(RunOutcome::NothingToDelete, plan));
        }

        writeln!(self.out)?;
        self.out.flush()?;
        if !self.confirm_or_abort().await? {
            writeln!(self.out, "Operation cancelled.")?;
            info!("Cleanup cancelled by operator");
            return Ok(CleanupSummary::new(RunOutcome::Cancelled, plan));
        }

        let mut summary = CleanupSummary::new(RunOutcome::Completed, plan);
        self.delete_all(&mut summary).await?;
        self.report_summary(&summary)?;
        Ok(summary)
    }

    pub async fn list_remote_branches(&self) -> Result<Vec<String>> {
        let branches = self.host.list_branches().await?;
        debug!("Host reported {} branches", branches.len());
        Ok(branches)
    }

    /// `Ok(true)` only when the operator answered affirmatively.
    pub async fn confirm_or_abort(&self) -> Result<bool> {
        let confirmed = self
            .confirmer
            .confirm("Do you want to proceed with deleting these branches?")
            .await?;
        Ok(confirmed)
    }

    /// Delete one branch. A failure is returned as `CleanupError::Deletion`
    /// carrying the host's message.
    pub async fn delete_branch(&self, name: &str) -> Result<()> {
        self.host
            .delete_branch(name)
            .await
            .map_err(|e| CleanupError::Deletion {
                branch: name.to_string(),
                reason: e.host_message(),
            })
    }

    async fn delete_all(&mut self, summary: &mut CleanupSummary) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Deleting branches...")?;
        writeln!(self.out)?;

        let targets = summary.plan.to_delete.clone();
        for (index, name) in targets.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match self.delete_branch(name).await {
                Ok(()) => {
                    summary.deleted += 1;
                    info!("Deleted branch {}", name);
                    writeln!(self.out, "  ✓ Deleted: {name}")?;
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!("{}", e);
                    writeln!(
                        self.out,
                        "  ✗ Failed to delete {}: {}",
                        name,
                        e.host_message()
                    )?;
                    summary.failures.push(e);
                }
            }
        }
        Ok(())
    }

    fn banner(&mut self, title: &str) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{rule}")?;
        Ok(())
    }

    fn report_keep_list(&mut self, remote: &[String]) -> Result<()> {
        writeln!(self.out, "Branches to KEEP:")?;
        for status in keep_status(&self.keep, remote) {
            if status.present {
                writeln!(self.out, "  ✓ {}", status.name)?;
            } else {
                writeln!(self.out, "  ⚠ {} (not found in repository)", status.name)?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn report_plan(&mut self, plan: &CleanupPlan) -> Result<()> {
        writeln!(self.out, "Branches to DELETE: {}", self.delete.len())?;

        if !plan.already_gone.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "Branches already deleted or not found:")?;
            for name in &plan.already_gone {
                writeln!(self.out, "  - {name}")?;
            }
        }

        if !plan.conflicts.is_empty() {
            writeln!(self.out)?;
            for name in &plan.conflicts {
                warn!("Branch {} is in both the keep and delete lists", name);
                writeln!(
                    self.out,
                    "  ⚠ {name} is also in the keep list and will still be deleted"
                )?;
            }
        }

        writeln!(self.out)?;
        writeln!(
            self.out,
            "Branches that will be deleted: {}",
            plan.to_delete.len()
        )?;
        for name in &plan.to_delete {
            writeln!(self.out, "  - {name}")?;
        }
        Ok(())
    }

    fn report_summary(&mut self, summary: &CleanupSummary) -> Result<()> {
        writeln!(self.out)?;
        self.banner("Cleanup Summary")?;
        writeln!(self.out, "Successfully deleted: {}", summary.deleted)?;
        writeln!(self.out, "Failed to delete: {}", summary.failed)?;
        writeln!(self.out)?;
        writeln!(self.out, "To verify the cleanup, visit:")?;
        writeln!(self.out, "{}", self.repo.branches_url())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBranchHost, ScriptedConfirmer};

    fn config(keep: &[&str], delete: &[&str]) -> CleanupConfig {
        CleanupConfig {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            delay_ms: 0,
            keep: keep.iter().map(|s| s.to_string()).collect(),
            delete: delete.iter().map(|s| s.to_string()).collect(),
            ..CleanupConfig::default()
        }
    }

    fn runner(
        host: &Arc<MockBranchHost>,
        confirmer: &Arc<ScriptedConfirmer>,
        config: &CleanupConfig,
        dry_run: bool,
    ) -> CleanupRunner<Vec<u8>> {
        CleanupRunner::new(host.clone(), confirmer.clone(), config, dry_run, Vec::new())
    }

    fn output(runner: CleanupRunner<Vec<u8>>) -> String {
        String::from_utf8(runner.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_deletes_only_present_branches() {
        let host = Arc::new(MockBranchHost::with_branches(&["main", "feature-x"]));
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&["main"], &["feature-x", "feature-y"]);

        let mut runner = runner(&host, &confirmer, &config, false);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(summary.plan.to_delete, vec!["feature-x"]);
        assert_eq!(summary.plan.already_gone, vec!["feature-y"]);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(host.deleted(), vec!["feature-x"]);

        let text = output(runner);
        assert!(text.contains("Repository: acme/widgets"));
        assert!(text.contains("Total branches in repository: 2"));
        assert!(text.contains("  ✓ main"));
        assert!(text.contains("Branches already deleted or not found:\n  - feature-y"));
        assert!(text.contains("  ✓ Deleted: feature-x"));
        assert!(text.contains("Successfully deleted: 1"));
        assert!(text.contains("Failed to delete: 0"));
        assert!(text.contains("https://github.com/acme/widgets/branches"));
    }

    #[tokio::test]
    async fn test_dry_run_never_deletes_or_prompts() {
        let host = Arc::new(MockBranchHost::with_branches(&["main", "a", "b"]));
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&["main"], &["a", "b"]);

        let mut runner = runner(&host, &confirmer, &config, true);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::DryRun);
        assert_eq!(summary.plan.to_delete, vec!["a", "b"]);
        assert_eq!(summary.attempted(), 0);
        assert_eq!(host.delete_calls(), 0);
        assert_eq!(confirmer.prompts(), 0);
        assert!(output(runner).contains("DRY RUN - No branches were actually deleted."));
    }

    #[tokio::test]
    async fn test_non_affirmative_answers_cancel() {
        for answer in ["no", "y", "", "yes please", "oui"] {
            let host = Arc::new(MockBranchHost::with_branches(&["main", "a"]));
            let confirmer = Arc::new(ScriptedConfirmer::answering(answer));
            let config = config(&["main"], &["a"]);

            let mut runner = runner(&host, &confirmer, &config, false);
            let summary = runner.run().await.unwrap();

            assert_eq!(summary.outcome, RunOutcome::Cancelled, "answer {answer:?}");
            assert_eq!(host.delete_calls(), 0, "answer {answer:?}");
            assert_eq!(confirmer.prompts(), 1);
            assert!(output(runner).contains("Operation cancelled."));
        }
    }

    #[tokio::test]
    async fn test_affirmative_answer_is_case_insensitive() {
        let host = Arc::new(MockBranchHost::with_branches(&["a"]));
        let confirmer = Arc::new(ScriptedConfirmer::answering("YES"));
        let config = config(&[], &["a"]);

        let summary = runner(&host, &confirmer, &config, false)
            .run()
            .await
            .unwrap();
        assert_eq!(summary.deleted, 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let host = Arc::new(
            MockBranchHost::with_branches(&["a", "protected", "b"]).failing_on(
                "protected",
                CleanupError::Api {
                    status: 422,
                    message: "Cannot delete protected branch".to_string(),
                },
            ),
        );
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&[], &["a", "protected", "b"]);

        let mut runner = runner(&host, &confirmer, &config, false);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.deleted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.attempted(), summary.plan.to_delete.len());
        assert_eq!(host.delete_calls(), 3);
        assert_eq!(host.deleted(), vec!["a", "b"]);
        assert!(matches!(
            &summary.failures[0],
            CleanupError::Deletion { branch, reason }
                if branch == "protected" && reason == "Cannot delete protected branch"
        ));

        let text = output(runner);
        assert!(text.contains("  ✗ Failed to delete protected: Cannot delete protected branch"));
        assert!(text.contains("Failed to delete: 1"));
    }

    #[tokio::test]
    async fn test_keep_list_entry_is_still_deleted() {
        let host = Arc::new(MockBranchHost::with_branches(&["main", "old"]));
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&["main"], &["main", "old"]);

        let mut runner = runner(&host, &confirmer, &config, false);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.plan.conflicts, vec!["main"]);
        assert_eq!(host.deleted(), vec!["main", "old"]);
        assert!(output(runner).contains("main is also in the keep list and will still be deleted"));
    }

    #[tokio::test]
    async fn test_nothing_to_delete_skips_prompt() {
        let host = Arc::new(MockBranchHost::with_branches(&["main"]));
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&["main", "release"], &["gone"]);

        let mut runner = runner(&host, &confirmer, &config, false);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::NothingToDelete);
        assert_eq!(confirmer.prompts(), 0);
        assert_eq!(host.delete_calls(), 0);
        assert!(output(runner).contains("  ⚠ release (not found in repository)"));
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let host = Arc::new(MockBranchHost::with_branches(&["a"]).failing_listing(
            CleanupError::Auth("Bad credentials".to_string()),
        ));
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&[], &["a"]);

        let err = runner(&host, &confirmer, &config, false)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, CleanupError::Auth(_)));
        assert_eq!(host.delete_calls(), 0);
        assert_eq!(confirmer.prompts(), 0);
    }

    #[tokio::test]
    async fn test_repository_failure_is_fatal() {
        let host = Arc::new(
            MockBranchHost::with_branches(&["a"])
                .failing_repository(CleanupError::NotFound("Not Found".to_string())),
        );
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&[], &["a"]);

        let err = runner(&host, &confirmer, &config, true)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, CleanupError::NotFound(_)));
        assert_eq!(host.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_pauses_between_deletions() {
        let host = Arc::new(MockBranchHost::with_branches(&["a", "b", "c"]));
        let confirmer = Arc::new(ScriptedConfirmer::answering("yes"));
        let config = config(&[], &["a", "b", "c"]);

        let mut runner =
            runner(&host, &confirmer, &config, false).with_delay(Duration::from_millis(20));
        let started = std::time::Instant::now();
        runner.run().await.unwrap();

        // Two pauses for three deletions
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert_eq!(host.delete_calls(), 3);
    }
}

//! Built-in repository and branch lists, used when no settings file is given.

pub const REPO_OWNER: &str = "Qobustan";
pub const REPO_NAME: &str = "Seminar-Angewandte-Statistik-2025";

/// Main branch and branches backing open pull requests.
pub const BRANCHES_TO_KEEP: &[&str] = &[
    "main",
    "copilot/link-local-wiki-to-github",
    "copilot/delete-obsolete-branches",
];

/// Verified obsolete as of 2026-01-01. Update before re-running.
pub const OBSOLETE_BRANCHES: &[&str] = &[
    // Historical feature branches
    "Einen-Fork-für-eine-potentielle-Vorlage-in-der-Zukunft-(soll-nicht-gemerged-werden)",
    "Fertige,-nächtliche-Präsentationsversion",
    "Jetzt-auch-mit-kompilierendem-erstem-Beispiel!",
    "Mit-endgültigen-Tests",
    "Mit-vollständig-korrektem-Readme",
    "Nun-auch-mit-guter-Testabdeckung",
    "Verbesserte-Vorlage-(mit-abgeschwächtem-.gitignore)",
    // Merged pull request branches
    "copilot/add-missing-batch-scripts",
    "copilot/add-repo-wiki-files",
    "copilot/compare-non-pr-branches",
    "copilot/fix-generate-pdf-script",
    "copilot/fix-generate-pdf-script-again",
    "copilot/fix-github-actions-versions",
    "copilot/fix-latex-formula-errors",
    "copilot/improve-error-handling-perl-scripts",
    "copilot/improve-shell-scripts-error-handling",
    "copilot/refactor-script-files",
    "copilot/update-readme",
    "copilot/update-readme-again",
    "copilot/update-readme-another-one",
    "copilot/update-readme-documentation",
    "copilot/update-readme-with-new-structure",
    "copilot/update-readme-yet-again",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_do_not_overlap() {
        for keep in BRANCHES_TO_KEEP {
            assert!(!OBSOLETE_BRANCHES.contains(keep), "{keep} is in both lists");
        }
    }
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace preparation.
//!
//! ```text
//! dirty? ──reset off──────────────────────────> DirtyWorktree
//!   | reset on: reset --hard, recheck once ──dirty──> DirtyWorktree
//!   v
//! fetch origin (if enabled)       already up to date = ok
//!   v
//! not on main? checkout merge target, pull    already up to date = ok
//!   v
//! marker files present? ──missing (all listed)──> IncompatibleProject
//!   v
//! ready for mutation steps
//! ```

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::PrepareError;
use crate::git::{ORIGIN, RepoBackend, SyncOutcome, tolerate_up_to_date};
use crate::project::{GitState, Project, ProjectOptions};

/// Brings a discovered project to a clean, fetched, main-branch state.
#[derive(Clone)]
pub struct WorkspacePreparer {
    backend: Arc<dyn RepoBackend>,
    markers: Vec<String>,
}

impl WorkspacePreparer {
    #[must_use]
    pub fn new(backend: Arc<dyn RepoBackend>, markers: Vec<String>) -> Self {
        Self { backend, markers }
    }

    /// Runs each stage in order; the first failure stops the run.
    ///
    /// # Errors
    ///
    /// Returns the [`PrepareError`] of the stage that failed.
    pub async fn prepare(
        &self,
        project: &mut Project,
        options: &ProjectOptions,
    ) -> Result<(), PrepareError> {
        let path = project.path.clone();
        let git = project
            .git
            .as_mut()
            .ok_or_else(|| PrepareError::NoGitRoot { path: path.clone() })?;

        self.ensure_clean(git, options).await?;

        if options.fetch {
            let outcome = tolerate_up_to_date(self.backend.fetch(&git.root, ORIGIN).await)
                .map_err(PrepareError::FetchFailed)?;
            debug!(remote = ORIGIN, ?outcome, "fetched");
        }

        if options.checkout_main_branch && !git.in_main_branch {
            self.switch_to_main(git).await?;
        }

        let missing: Vec<String> = self
            .markers
            .iter()
            .filter(|marker| !path.join(marker.as_str()).exists())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PrepareError::IncompatibleProject { missing });
        }

        Ok(())
    }

    async fn ensure_clean(
        &self,
        git: &mut GitState,
        options: &ProjectOptions,
    ) -> Result<(), PrepareError> {
        if !git.is_dirty {
            return Ok(());
        }
        let dirty = || PrepareError::DirtyWorktree {
            path: git.root.clone(),
        };
        if !options.reset {
            return Err(dirty());
        }

        warn!(root = %git.root.display(), "resetting dirty worktree");
        self.backend
            .reset_hard(&git.root)
            .await
            .map_err(PrepareError::Reset)?;

        // single recheck; untracked files survive a hard reset
        let is_dirty = self
            .backend
            .status(&git.root)
            .await
            .map_err(PrepareError::Status)?
            .is_dirty();
        if is_dirty {
            return Err(dirty());
        }
        git.is_dirty = false;
        Ok(())
    }

    async fn switch_to_main(&self, git: &mut GitState) -> Result<(), PrepareError> {
        let main = git.main_branch.clone();
        let failed = |source| PrepareError::CheckoutFailed {
            branch: main.clone(),
            source,
        };

        let target = self
            .backend
            .branch_merge_target(&git.root, &main)
            .await
            .map_err(failed)?
            .unwrap_or_else(|| main.clone());

        info!(
            from = ?git.current_branch,
            branch = %target,
            "checking out main branch"
        );
        self.backend
            .checkout(&git.root, &target)
            .await
            .map_err(failed)?;

        let pulled = tolerate_up_to_date(self.backend.pull(&git.root).await).map_err(failed)?;
        if pulled == SyncOutcome::AlreadyUpToDate {
            debug!(branch = %target, "main branch already up to date");
        }

        git.current_branch = self
            .backend
            .current_branch(&git.root)
            .await
            .map_err(failed)?;
        git.refresh_in_main_branch();
        git.is_dirty = self
            .backend
            .status(&git.root)
            .await
            .map_err(PrepareError::Status)?
            .is_dirty();
        Ok(())
    }
}

#[cfg(test)]
mod tests;

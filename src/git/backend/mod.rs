// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository backend abstraction layer.
//!
//! ```text
//!                 RepoBackend (async, &self)
//!                 |                       |
//!                 v                       v
//!          ShellBackend               FakeBackend
//!   reads:  gix (.git, no subprocess)   in-memory state
//!   writes: git CLI (tokio::process)    call log
//! ```
//!
//! `fetch` and `pull` may report [`GitError::AlreadyUpToDate`]; callers
//! route them through [`tolerate_up_to_date`] so a no-op never surfaces as
//! a failure.

mod fake;
mod shell;

pub use fake::{FakeBackend, FakeCommit, FakePush, FakeRepo, FakeSync};
pub use shell::ShellBackend;

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

use crate::error::{GitError, GitResult};

/// Result of a fetch or pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncOutcome {
    Updated,
    AlreadyUpToDate,
}

/// Point-in-time worktree status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorktreeStatus {
    Clean,
    /// Staged, unstaged or untracked changes are present.
    Dirty,
}

impl WorktreeStatus {
    #[must_use]
    pub const fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }
}

/// Commit title and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub title: String,
    pub body: String,
}

/// Author and committer identity applied to a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Converts an "already up to date" failure into a successful no-op.
///
/// # Errors
///
/// Passes every other error through unchanged.
pub fn tolerate_up_to_date(result: GitResult<SyncOutcome>) -> GitResult<SyncOutcome> {
    match result {
        Err(GitError::AlreadyUpToDate { .. }) => Ok(SyncOutcome::AlreadyUpToDate),
        other => other,
    }
}

/// Git operations needed by discovery, preparation and publication.
///
/// Every method takes the repository root explicitly so one backend value
/// can serve concurrent runs on different repositories.
#[async_trait]
pub trait RepoBackend: Send + Sync {
    /// Short name of HEAD, or `None` when detached.
    async fn current_branch(&self, root: &Path) -> GitResult<Option<String>>;

    /// Every configured URL of `remote`, in configuration order.
    async fn remote_urls(&self, root: &Path, remote: &str) -> GitResult<Vec<String>>;

    /// Branch named by the local `refs/remotes/<remote>/HEAD`, if present.
    async fn remote_head(&self, root: &Path, remote: &str) -> GitResult<Option<String>>;

    /// Asks the remote for its default branch and records `refs/remotes/<remote>/HEAD`.
    async fn refresh_remote_head(&self, root: &Path, remote: &str) -> GitResult<()>;

    async fn status(&self, root: &Path) -> GitResult<WorktreeStatus>;

    async fn fetch(&self, root: &Path, remote: &str) -> GitResult<SyncOutcome>;

    /// Branch that `branch` merges from, per `branch.<name>.merge`.
    async fn branch_merge_target(&self, root: &Path, branch: &str) -> GitResult<Option<String>>;

    async fn checkout(&self, root: &Path, branch: &str) -> GitResult<()>;

    /// Fast-forwards the current branch from its upstream.
    async fn pull(&self, root: &Path) -> GitResult<SyncOutcome>;

    /// Hard reset of index and worktree to HEAD.
    async fn reset_hard(&self, root: &Path) -> GitResult<()>;

    /// Writes unstaged diff, staged diff and status to stderr.
    async fn show_diff(&self, root: &Path) -> GitResult<()>;

    /// Force-deletes a local branch; [`GitError::BranchNotFound`] when absent.
    async fn delete_branch(&self, root: &Path, branch: &str) -> GitResult<()>;

    /// Creates `branch` at HEAD and checks it out.
    async fn create_branch(&self, root: &Path, branch: &str) -> GitResult<()>;

    /// Stages everything and records a signed-off commit.
    async fn commit_all(
        &self,
        root: &Path,
        message: &CommitMessage,
        identity: &CommitIdentity,
    ) -> GitResult<()>;

    /// Pushes `branch` to `remote` and sets upstream.
    async fn push(&self, root: &Path, remote: &str, branch: &str, force: bool) -> GitResult<()>;
}

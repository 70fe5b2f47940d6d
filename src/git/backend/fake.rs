// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory backend for exercising the pipeline without git.
//!
//! Each root maps to a [`FakeRepo`] holding plain state. Every call is
//! appended to a log so tests can assert what ran and in which order.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{CommitIdentity, CommitMessage, RepoBackend, SyncOutcome, WorktreeStatus};
use crate::error::{GitError, GitResult};

/// Scripted result for fetch and pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeSync {
    Updated,
    /// Reported as [`GitError::AlreadyUpToDate`].
    UpToDate,
    Fail(String),
}

/// A commit recorded by [`FakeBackend::commit_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCommit {
    pub branch: Option<String>,
    pub title: String,
    pub body: String,
    pub author: String,
}

/// A push recorded by [`FakeBackend::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakePush {
    pub remote: String,
    pub branch: String,
    pub force: bool,
}

/// State of one fake repository.
#[derive(Debug, Clone)]
pub struct FakeRepo {
    pub current_branch: Option<String>,
    pub origin_urls: Vec<String>,
    /// Local `origin/HEAD` target.
    pub remote_head: Option<String>,
    /// What `refresh_remote_head` learns from the remote.
    pub remote_default_branch: Option<String>,
    pub dirty: bool,
    /// Dirty state left behind by `reset_hard`.
    pub dirty_after_reset: bool,
    pub fetch: FakeSync,
    pub pull: FakeSync,
    pub merge_targets: HashMap<String, String>,
    pub branches: BTreeSet<String>,
    pub fail_checkout: bool,
    pub fail_show_diff: bool,
    pub fail_commit: bool,
    pub fail_push: bool,
    pub commits: Vec<FakeCommit>,
    pub pushes: Vec<FakePush>,
}

impl FakeRepo {
    /// Clean repository checked out on `main`, tracking `origin/main`.
    #[must_use]
    pub fn new(origin_url: &str) -> Self {
        Self {
            current_branch: Some("main".to_string()),
            origin_urls: vec![origin_url.to_string()],
            remote_head: Some("main".to_string()),
            remote_default_branch: Some("main".to_string()),
            dirty: false,
            dirty_after_reset: false,
            fetch: FakeSync::Updated,
            pull: FakeSync::Updated,
            merge_targets: HashMap::new(),
            branches: BTreeSet::from(["main".to_string()]),
            fail_checkout: false,
            fail_show_diff: false,
            fail_commit: false,
            fail_push: false,
            commits: Vec::new(),
            pushes: Vec::new(),
        }
    }

    #[must_use]
    pub fn on_branch(mut self, branch: &str) -> Self {
        self.current_branch = Some(branch.to_string());
        self.branches.insert(branch.to_string());
        self
    }

    #[must_use]
    pub const fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }
}

/// Shared in-memory [`RepoBackend`].
#[derive(Debug, Default)]
pub struct FakeBackend {
    repos: Mutex<HashMap<PathBuf, FakeRepo>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_repo(self, root: impl Into<PathBuf>, repo: FakeRepo) -> Self {
        self.insert(root, repo);
        self
    }

    pub fn insert(&self, root: impl Into<PathBuf>, repo: FakeRepo) {
        self.repos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(root.into(), repo);
    }

    /// Snapshot of the repository state at `root`.
    #[must_use]
    pub fn repo(&self, root: &Path) -> Option<FakeRepo> {
        self.repos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(root)
            .cloned()
    }

    /// Every call made so far, formatted as `"<op> <args>"`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn with<T>(
        &self,
        root: &Path,
        call: String,
        f: impl FnOnce(&mut FakeRepo) -> GitResult<T>,
    ) -> GitResult<T> {
        self.record(call.clone());
        let mut repos = self.repos.lock().unwrap_or_else(PoisonError::into_inner);
        let repo = repos.get_mut(root).ok_or_else(|| GitError::CommandFailed {
            command: call,
            message: format!("not a git repository: {}", root.display()),
        })?;
        f(repo)
    }
}

fn scripted(sync: &FakeSync, operation: &str) -> GitResult<SyncOutcome> {
    match sync {
        FakeSync::Updated => Ok(SyncOutcome::Updated),
        FakeSync::UpToDate => Err(GitError::AlreadyUpToDate {
            operation: operation.to_string(),
        }),
        FakeSync::Fail(message) => Err(GitError::CommandFailed {
            command: format!("git {operation}"),
            message: message.clone(),
        }),
    }
}

fn failed(command: &str) -> GitError {
    GitError::CommandFailed {
        command: format!("git {command}"),
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl RepoBackend for FakeBackend {
    async fn current_branch(&self, root: &Path) -> GitResult<Option<String>> {
        self.with(root, "current_branch".to_string(), |repo| {
            Ok(repo.current_branch.clone())
        })
    }

    async fn remote_urls(&self, root: &Path, remote: &str) -> GitResult<Vec<String>> {
        self.with(root, format!("remote_urls {remote}"), |repo| {
            Ok(if remote == "origin" {
                repo.origin_urls.clone()
            } else {
                Vec::new()
            })
        })
    }

    async fn remote_head(&self, root: &Path, remote: &str) -> GitResult<Option<String>> {
        self.with(root, format!("remote_head {remote}"), |repo| {
            Ok(repo.remote_head.clone())
        })
    }

    async fn refresh_remote_head(&self, root: &Path, remote: &str) -> GitResult<()> {
        self.with(root, format!("refresh_remote_head {remote}"), |repo| {
            repo.remote_head.clone_from(&repo.remote_default_branch);
            Ok(())
        })
    }

    async fn status(&self, root: &Path) -> GitResult<WorktreeStatus> {
        self.with(root, "status".to_string(), |repo| {
            Ok(if repo.dirty {
                WorktreeStatus::Dirty
            } else {
                WorktreeStatus::Clean
            })
        })
    }

    async fn fetch(&self, root: &Path, remote: &str) -> GitResult<SyncOutcome> {
        self.with(root, format!("fetch {remote}"), |repo| {
            scripted(&repo.fetch, "fetch")
        })
    }

    async fn branch_merge_target(&self, root: &Path, branch: &str) -> GitResult<Option<String>> {
        self.with(root, format!("branch_merge_target {branch}"), |repo| {
            Ok(repo.merge_targets.get(branch).cloned())
        })
    }

    async fn checkout(&self, root: &Path, branch: &str) -> GitResult<()> {
        self.with(root, format!("checkout {branch}"), |repo| {
            if repo.fail_checkout {
                return Err(failed("checkout"));
            }
            repo.current_branch = Some(branch.to_string());
            repo.branches.insert(branch.to_string());
            Ok(())
        })
    }

    async fn pull(&self, root: &Path) -> GitResult<SyncOutcome> {
        self.with(root, "pull".to_string(), |repo| scripted(&repo.pull, "pull"))
    }

    async fn reset_hard(&self, root: &Path) -> GitResult<()> {
        self.with(root, "reset_hard".to_string(), |repo| {
            repo.dirty = repo.dirty_after_reset;
            Ok(())
        })
    }

    async fn show_diff(&self, root: &Path) -> GitResult<()> {
        self.with(root, "show_diff".to_string(), |repo| {
            if repo.fail_show_diff {
                return Err(failed("diff"));
            }
            Ok(())
        })
    }

    async fn delete_branch(&self, root: &Path, branch: &str) -> GitResult<()> {
        self.with(root, format!("delete_branch {branch}"), |repo| {
            if repo.branches.remove(branch) {
                Ok(())
            } else {
                Err(GitError::BranchNotFound {
                    branch: branch.to_string(),
                })
            }
        })
    }

    async fn create_branch(&self, root: &Path, branch: &str) -> GitResult<()> {
        self.with(root, format!("create_branch {branch}"), |repo| {
            if !repo.branches.insert(branch.to_string()) {
                return Err(GitError::CommandFailed {
                    command: format!("git checkout -b {branch}"),
                    message: format!("a branch named '{branch}' already exists"),
                });
            }
            repo.current_branch = Some(branch.to_string());
            Ok(())
        })
    }

    async fn commit_all(
        &self,
        root: &Path,
        message: &CommitMessage,
        identity: &CommitIdentity,
    ) -> GitResult<()> {
        self.with(root, format!("commit_all {}", message.title), |repo| {
            if repo.fail_commit {
                return Err(failed("commit"));
            }
            repo.commits.push(FakeCommit {
                branch: repo.current_branch.clone(),
                title: message.title.clone(),
                body: message.body.clone(),
                author: format!("{} <{}>", identity.name, identity.email),
            });
            repo.dirty = false;
            Ok(())
        })
    }

    async fn push(&self, root: &Path, remote: &str, branch: &str, force: bool) -> GitResult<()> {
        self.with(root, format!("push {remote} {branch}"), |repo| {
            if repo.fail_push {
                return Err(failed("push"));
            }
            repo.pushes.push(FakePush {
                remote: remote.to_string(),
                branch: branch.to_string(),
                force,
            });
            Ok(())
        })
    }
}

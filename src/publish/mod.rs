// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Change publication.
//!
//! ```text
//! show_diff? ──> git diff / diff --cached / status (stderr)
//!   |
//! open_pr? ──no──> Local
//!   |
//! worktree clean? ──yes──> NoChanges
//!   |
//! branch -D <branch>      (absent or failing: ignored)
//! checkout -b <branch>
//! commit -s (bot identity)
//! push -u origin <branch> -f
//!   |
//! create PR ──ok──> Opened
//!   |
//!   └─failed──> list open PRs ──> ListedOpen   (never fatal)
//! ```

mod host;
mod identity;

pub use host::PullRequestHost;
pub use identity::BotIdentity;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{GitError, PublishError};
use crate::git::{CommitMessage, ORIGIN, RepoBackend};
use crate::github::{NewPullRequest, PullRequest};
use crate::project::{Project, ProjectOptions};

/// Body of every maintenance commit and pull request.
pub const PR_BODY: &str = "more details: https://github.com/moul/repoman";

/// What publication ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Pull request publication was disabled.
    Local,
    /// Mutation steps left the worktree clean; nothing was committed.
    NoChanges,
    /// Branch pushed; no pull-request host was configured.
    Pushed { branch: String },
    /// Branch pushed and a pull request opened.
    Opened { branch: String, pull: PullRequest },
    /// Branch pushed; creation failed, open pull requests listed instead.
    ListedOpen {
        branch: String,
        open: Vec<PullRequest>,
    },
}

/// Commits mutation results on a maintenance branch and proposes them upstream.
#[derive(Clone)]
pub struct ChangePublisher {
    backend: Arc<dyn RepoBackend>,
    host: Option<Arc<dyn PullRequestHost>>,
    identity: Option<BotIdentity>,
}

impl ChangePublisher {
    #[must_use]
    pub fn new(backend: Arc<dyn RepoBackend>) -> Self {
        Self {
            backend,
            host: None,
            identity: None,
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: Arc<dyn PullRequestHost>) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: BotIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Publishes the current worktree changes of `project` on `branch`.
    ///
    /// Re-running replaces any earlier attempt: the branch is recreated and
    /// force-pushed.
    ///
    /// # Errors
    ///
    /// Returns a [`PublishError`] when the diff report, branch creation,
    /// commit or push fails. Pull-request failures are not errors.
    pub async fn publish(
        &self,
        project: &Project,
        options: &ProjectOptions,
        branch: &str,
        title: &str,
    ) -> Result<PublishOutcome, PublishError> {
        let git = project.git.as_ref().ok_or_else(|| PublishError::NoGitRoot {
            path: project.path.clone(),
        })?;
        let root = git.root.as_path();

        if options.show_diff {
            self.backend
                .show_diff(root)
                .await
                .map_err(PublishError::ShowDiff)?;
        }

        if !options.open_pr {
            return Ok(PublishOutcome::Local);
        }

        let identity = self.identity.as_ref().ok_or_else(|| {
            PublishError::Identity("no bot identity configured".to_string())
        })?;

        let dirty = self
            .backend
            .status(root)
            .await
            .map_err(PublishError::Commit)?
            .is_dirty();
        // A clean tree stops here instead of pushing an empty branch and
        // opening a pull request with no diff.
        if !dirty {
            info!(project = %project.label(), "no changes to publish");
            return Ok(PublishOutcome::NoChanges);
        }

        match self.backend.delete_branch(root, branch).await {
            Ok(()) => debug!(branch, "deleted previous maintenance branch"),
            Err(GitError::BranchNotFound { .. }) => {}
            Err(e) => warn!(branch, error = %e, "could not delete previous branch"),
        }

        self.backend
            .create_branch(root, branch)
            .await
            .map_err(|source| PublishError::Branch {
                branch: branch.to_string(),
                source,
            })?;

        let message = CommitMessage {
            title: title.to_string(),
            body: PR_BODY.to_string(),
        };
        self.backend
            .commit_all(root, &message, &identity.commit_identity())
            .await
            .map_err(PublishError::Commit)?;

        self.backend
            .push(root, ORIGIN, branch, true)
            .await
            .map_err(|source| PublishError::Push {
                branch: branch.to_string(),
                source,
            })?;
        info!(project = %project.label(), branch, "pushed maintenance branch");

        let Some(host) = &self.host else {
            warn!(branch, "no pull request host configured");
            return Ok(PublishOutcome::Pushed {
                branch: branch.to_string(),
            });
        };

        let pull = NewPullRequest {
            title: title.to_string(),
            body: PR_BODY.to_string(),
            head: branch.to_string(),
            base: git.main_branch.clone(),
        };
        match host
            .create_pull_request(&git.repo_owner, &git.repo_name, &pull)
            .await
        {
            Ok(pull) => {
                info!(url = %pull.html_url, "opened pull request");
                Ok(PublishOutcome::Opened {
                    branch: branch.to_string(),
                    pull,
                })
            }
            Err(e) => {
                warn!(error = %e, "pull request creation failed, listing open pull requests");
                let open = host
                    .list_open_pull_requests(&git.repo_owner, &git.repo_name)
                    .await
                    .unwrap_or_else(|e| {
                        warn!(error = %e, "could not list open pull requests");
                        Vec::new()
                    });
                Ok(PublishOutcome::ListedOpen {
                    branch: branch.to_string(),
                    open,
                })
            }
        }
    }
}

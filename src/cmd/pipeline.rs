// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository maintenance pipeline.
//!
//! ```text
//! path --discover--> Project --prepare--> clean main checkout
//!                                             |
//!                                   run_steps (mutation)
//!                                             |
//!                                   publish --> PublishOutcome
//! ```

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{PrepareError, RepomanError, RepomanResult};
use crate::git::{RepoBackend, discover};
use crate::project::ProjectOptions;
use crate::publish::{ChangePublisher, PublishOutcome};
use crate::steps::{MutationStep, StepContext, run_steps};
use crate::workspace::WorkspacePreparer;

/// Discover, prepare, mutate and publish one repository.
///
/// One value serves every repository of a run; share it behind an [`Arc`].
pub struct Pipeline {
    backend: Arc<dyn RepoBackend>,
    preparer: WorkspacePreparer,
    publisher: ChangePublisher,
    steps: Vec<Box<dyn MutationStep>>,
    options: ProjectOptions,
    branch: String,
    title: String,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        backend: Arc<dyn RepoBackend>,
        markers: Vec<String>,
        publisher: ChangePublisher,
        options: ProjectOptions,
    ) -> Self {
        Self {
            preparer: WorkspacePreparer::new(Arc::clone(&backend), markers),
            backend,
            publisher,
            steps: Vec::new(),
            options,
            branch: String::new(),
            title: String::new(),
        }
    }

    #[must_use]
    pub fn with_steps(mut self, steps: Vec<Box<dyn MutationStep>>) -> Self {
        self.steps = steps;
        self
    }

    /// Branch and commit/pull request title used by the publisher.
    #[must_use]
    pub fn with_change(mut self, branch: impl Into<String>, title: impl Into<String>) -> Self {
        self.branch = branch.into();
        self.title = title.into();
        self
    }

    #[must_use]
    pub const fn options(&self) -> &ProjectOptions {
        &self.options
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Runs the whole pipeline on `path`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that failed: discovery,
    /// preparation, a mutation step or publication.
    pub async fn run(&self, path: &str, cancel: CancellationToken) -> RepomanResult<PublishOutcome> {
        let mut project = discover(Path::new(path), self.backend.as_ref()).await?;
        debug!(project = %project.label(), "discovered");

        self.preparer.prepare(&mut project, &self.options).await?;

        let ctx = StepContext::for_project(&project, cancel.clone()).ok_or_else(|| {
            PrepareError::NoGitRoot {
                path: project.path.clone(),
            }
        })?;
        run_steps(&self.steps, &ctx).await?;

        if cancel.is_cancelled() {
            return Err(RepomanError::Cancelled);
        }

        let outcome = self
            .publisher
            .publish(&project, &self.options, &self.branch, &self.title)
            .await?;
        report(&outcome);
        Ok(outcome)
    }
}

fn report(outcome: &PublishOutcome) {
    match outcome {
        PublishOutcome::Local | PublishOutcome::NoChanges => {}
        PublishOutcome::Pushed { branch } => info!(branch = %branch, "branch pushed"),
        PublishOutcome::Opened { pull, .. } => info!(url = %pull.html_url, "pull request opened"),
        PublishOutcome::ListedOpen { open, .. } => {
            if open.is_empty() {
                eprintln!("no open pull requests");
            }
            for pull in open {
                eprintln!("{}", pull.listing_line());
            }
        }
    }
}

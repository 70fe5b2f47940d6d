// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mutation steps applied between workspace preparation and publication.
//!
//! ```text
//! prepared worktree
//!        |
//!        v
//!  run_steps(steps, ctx) ---- each: MutationStep::apply(&StepContext)
//!        |                     first Err aborts -> MutationError { step }
//!        v
//!  Change Publisher
//!
//! maintenance:          bump-deps (CommandStep), template-files, rules-mk,
//!                       authors, copyright-year, lint-version
//! template-post-clone:  remove-go-binary, template-substitution
//! ```
//!
//! Steps only touch files (or run subprocesses) inside the checkout. Staging
//! and committing belong to the publisher, which records every change with
//! `git add -A`.

mod command;
mod copyright;
mod go_binary;
mod lint;
mod rules_mk;
mod template;

pub use command::CommandStep;
pub use copyright::{COPYRIGHT_FILES, COPYRIGHT_PREFIXES, CopyrightYearStep, patch_copyright};
pub use go_binary::{RemoveGoBinaryStep, strip_makefile};
pub use lint::{LintVersionStep, patch_lint_version};
pub use rules_mk::{AuthorsStep, RULES_MK, RulesMkStep};
pub use template::{TEMPLATE_FILES, TemplateFilesStep, TemplateSubstitutionStep};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::MutationError;
use crate::project::Project;

/// A pluggable operation on a prepared worktree.
#[async_trait]
pub trait MutationStep: Send + Sync {
    /// Short kebab-case name used in logs and error messages.
    fn name(&self) -> &str;

    /// Applies the change to the worktree.
    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()>;
}

/// What a step may know about the repository it is mutating.
#[derive(Debug, Clone)]
pub struct StepContext {
    path: PathBuf,
    root: PathBuf,
    owner: String,
    name: String,
    cancel: CancellationToken,
}

impl StepContext {
    #[must_use]
    pub const fn new(
        path: PathBuf,
        root: PathBuf,
        owner: String,
        name: String,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            path,
            root,
            owner,
            name,
            cancel,
        }
    }

    /// Context for a discovered project; `None` outside a git repository.
    #[must_use]
    pub fn for_project(project: &Project, cancel: CancellationToken) -> Option<Self> {
        let git = project.git.as_ref()?;
        Some(Self::new(
            project.path.clone(),
            git.root.clone(),
            git.repo_owner.clone(),
            git.repo_name.clone(),
            cancel,
        ))
    }

    /// Directory the user pointed at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repository root containing `.git`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Runs `steps` in order; the first failure aborts the rest.
///
/// # Errors
///
/// Returns a [`MutationError`] naming the failing step. Cancellation
/// between steps is reported the same way.
pub async fn run_steps(
    steps: &[Box<dyn MutationStep>],
    ctx: &StepContext,
) -> Result<(), MutationError> {
    for step in steps {
        if ctx.cancel_token().is_cancelled() {
            return Err(MutationError {
                step: step.name().to_string(),
                source: anyhow::anyhow!("cancelled"),
            });
        }
        info!(project = %ctx.path().display(), step = step.name(), "applying step");
        step.apply(ctx).await.map_err(|source| MutationError {
            step: step.name().to_string(),
            source,
        })?;
        debug!(project = %ctx.path().display(), step = step.name(), "step done");
    }
    Ok(())
}

/// Steps of the `maintenance` subcommand, in execution order.
#[must_use]
pub fn maintenance_steps(
    config: &Config,
    bump_deps: bool,
    standard: bool,
) -> Vec<Box<dyn MutationStep>> {
    let mut steps: Vec<Box<dyn MutationStep>> = Vec::new();
    if bump_deps {
        steps.push(Box::new(CommandStep::from_argv(
            "bump-deps",
            &config.maintenance.bump_deps_command,
        )));
    }
    if standard {
        steps.push(Box::new(TemplateFilesStep::new(config.template_dir())));
        steps.push(Box::new(RulesMkStep::new(config.rules_mk_source())));
        steps.push(Box::new(AuthorsStep::from_argv(
            &config.maintenance.authors_command,
        )));
        steps.push(Box::new(CopyrightYearStep::current()));
        steps.push(Box::new(LintVersionStep::new(
            config.maintenance.lint_version.clone(),
        )));
    }
    steps
}

/// Steps of the `template-post-clone` subcommand, in execution order.
#[must_use]
pub fn template_steps(
    template_name: &str,
    template_owner: &str,
    remove_go_binary: bool,
) -> Vec<Box<dyn MutationStep>> {
    let mut steps: Vec<Box<dyn MutationStep>> = Vec::new();
    if remove_go_binary {
        steps.push(Box::new(RemoveGoBinaryStep::new()));
    }
    steps.push(Box::new(TemplateSubstitutionStep::new(
        template_name,
        template_owner,
    )));
    steps
}

#[cfg(test)]
mod tests;

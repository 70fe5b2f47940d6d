// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Steps for projects built with the shared `rules.mk`.
//!
//! Both are no-ops unless the project root already carries a `rules.mk`.

use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::{CommandStep, MutationStep, StepContext};

pub const RULES_MK: &str = "rules.mk";

/// Replaces the project's `rules.mk` with the upstream copy.
#[derive(Debug, Clone)]
pub struct RulesMkStep {
    source: PathBuf,
}

impl RulesMkStep {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[async_trait]
impl MutationStep for RulesMkStep {
    fn name(&self) -> &str {
        "rules-mk"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        let target = ctx.path().join(RULES_MK);
        if !target.is_file() {
            debug!("no rules.mk in project, skipping");
            return Ok(());
        }
        if !self.source.is_file() {
            debug!(source = %self.source.display(), "upstream rules.mk missing, skipping");
            return Ok(());
        }
        if target.canonicalize().ok() == self.source.canonicalize().ok() {
            return Ok(());
        }
        tokio::fs::copy(&self.source, &target)
            .await
            .with_context(|| format!("failed to copy {}", self.source.display()))?;
        debug!(source = %self.source.display(), "rules.mk refreshed");
        Ok(())
    }
}

/// Regenerates `AUTHORS` through the `rules.mk` target.
///
/// A failing command is logged and ignored; cancellation still fails the step.
#[derive(Debug, Clone)]
pub struct AuthorsStep {
    command: CommandStep,
}

impl AuthorsStep {
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Self {
        Self {
            command: CommandStep::from_argv("authors", argv),
        }
    }
}

#[async_trait]
impl MutationStep for AuthorsStep {
    fn name(&self) -> &str {
        "authors"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        if !ctx.path().join(RULES_MK).is_file() {
            debug!("no rules.mk in project, skipping");
            return Ok(());
        }
        match self.command.apply(ctx).await {
            Err(err) if !ctx.cancel_token().is_cancelled() => {
                warn!(error = %err, "authors generation failed, keeping existing AUTHORS");
                Ok(())
            }
            other => other,
        }
    }
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use async_trait::async_trait;
use regex::{Captures, Regex};
use tracing::debug;

use super::{MutationStep, StepContext};
use crate::utility::fs::walk::{WalkOptions, find_files};

const WORKFLOWS_GLOB: &str = ".github/workflows/*.yml";

/// Raises pinned `golangci-lint` versions in GitHub workflows.
#[derive(Debug, Clone)]
pub struct LintVersionStep {
    target: String,
}

impl LintVersionStep {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

#[async_trait]
impl MutationStep for LintVersionStep {
    fn name(&self) -> &str {
        "lint-version"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        let workflows = find_files(ctx.path(), WORKFLOWS_GLOB, &WalkOptions::for_worktree())?;
        for path in workflows {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let patched = patch_lint_version(&content, &self.target)?;
            if patched != content {
                debug!(path = %path.display(), target = %self.target, "patch lint version");
                tokio::fs::write(&path, patched)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// Replaces every `version: v1.N` with `target` when `N` is older.
///
/// # Errors
///
/// Returns an error if `target` is not of the form `v1.N`.
pub fn patch_lint_version(content: &str, target: &str) -> anyhow::Result<String> {
    let target_re = Regex::new(r"^v1\.(\d+)$").context("failed to compile version regex")?;
    let target_minor: u32 = target_re
        .captures(target)
        .and_then(|caps| caps[1].parse().ok())
        .with_context(|| format!("invalid lint version '{target}'"))?;

    let pinned =
        Regex::new(r"version: v1\.(\d+)\b").context("failed to compile version regex")?;
    Ok(pinned
        .replace_all(content, |caps: &Captures<'_>| {
            match caps[1].parse::<u32>() {
                Ok(minor) if minor < target_minor => format!("version: {target}"),
                _ => caps[0].to_string(),
            }
        })
        .into_owned())
}

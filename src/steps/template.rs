// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{MutationStep, StepContext};
use crate::utility::fs::walk::{WalkOptions, parallel_walk};

/// Files synced from the template checkout, relative to both roots.
pub const TEMPLATE_FILES: [&str; 2] = [".github/renovate.json", ".github/dependabot.yml"];

/// Renovate config location used before it moved under `.github/`.
const LEGACY_RENOVATE: &str = "renovate.json";

/// Bytes inspected for a NUL when deciding if a file is binary.
const BINARY_SNIFF_LEN: usize = 8000;

/// Files larger than this are never rewritten.
const MAX_SUBSTITUTION_SIZE: u64 = 4 * 1024 * 1024;

/// Syncs bot configuration files from a local template checkout.
#[derive(Debug, Clone)]
pub struct TemplateFilesStep {
    template_dir: PathBuf,
}

impl TemplateFilesStep {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }
}

#[async_trait]
impl MutationStep for TemplateFilesStep {
    fn name(&self) -> &str {
        "template-files"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        let github_dir = ctx.path().join(".github");
        let legacy = ctx.path().join(LEGACY_RENOVATE);
        if legacy.is_file() {
            tokio::fs::create_dir_all(&github_dir)
                .await
                .with_context(|| format!("failed to create {}", github_dir.display()))?;
            let target = ctx.path().join(TEMPLATE_FILES[0]);
            debug!(from = %legacy.display(), to = %target.display(), "move renovate config");
            tokio::fs::rename(&legacy, &target)
                .await
                .with_context(|| format!("failed to move {}", legacy.display()))?;
        }

        if !self.template_dir.is_dir() {
            debug!(template = %self.template_dir.display(), "template directory missing, skipping copy");
            return Ok(());
        }
        if same_dir(&self.template_dir, ctx.path()) {
            debug!("project is the template itself, skipping copy");
            return Ok(());
        }

        for file in TEMPLATE_FILES {
            let source = self.template_dir.join(file);
            if !source.is_file() {
                continue;
            }
            let target = ctx.path().join(file);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            tokio::fs::copy(&source, &target)
                .await
                .with_context(|| format!("failed to copy {}", source.display()))?;
            debug!(file, "copied from template");
        }
        Ok(())
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Replaces template placeholders with the repository's own names.
///
/// Every file under the project directory except `.git/` is visited; files
/// that look binary or exceed a few MiB are skipped. The template name is
/// replaced before the owner.
#[derive(Debug, Clone)]
pub struct TemplateSubstitutionStep {
    template_name: String,
    template_owner: String,
}

impl TemplateSubstitutionStep {
    pub fn new(template_name: impl Into<String>, template_owner: impl Into<String>) -> Self {
        Self {
            template_name: template_name.into(),
            template_owner: template_owner.into(),
        }
    }

    /// Returns the rewritten text, or `None` when nothing changes.
    #[must_use]
    pub fn substitute(&self, content: &str, repo_name: &str, repo_owner: &str) -> Option<String> {
        let mut text = content.to_string();
        if !self.template_name.is_empty() {
            text = text.replace(&self.template_name, repo_name);
        }
        if !self.template_owner.is_empty() {
            text = text.replace(&self.template_owner, repo_owner);
        }
        (text != content).then_some(text)
    }
}

#[async_trait]
impl MutationStep for TemplateSubstitutionStep {
    fn name(&self) -> &str {
        "template-substitution"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        let root = ctx.path().to_path_buf();
        let walk = tokio::task::spawn_blocking(move || {
            parallel_walk(&root, &WalkOptions::for_worktree())
        })
        .await??;
        if walk.error_count() > 0 {
            anyhow::bail!("failed to walk {} entries", walk.error_count());
        }

        let mut patched = 0usize;
        for path in walk.files() {
            let size = tokio::fs::metadata(path)
                .await
                .with_context(|| format!("failed to stat {}", path.display()))?
                .len();
            if size > MAX_SUBSTITUTION_SIZE {
                debug!(path = %path.display(), size, "skip large file");
                continue;
            }
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            if bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0) {
                continue;
            }
            let Ok(content) = std::str::from_utf8(&bytes) else {
                continue;
            };
            if let Some(text) = self.substitute(content, ctx.name(), ctx.owner()) {
                debug!(path = %path.display(), "patch file");
                tokio::fs::write(path, text)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                patched += 1;
            }
        }
        info!(project = %ctx.path().display(), patched, "template strings replaced");
        Ok(())
    }
}

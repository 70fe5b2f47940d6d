// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use std::io::ErrorKind;
use tracing::debug;

use super::{CommandStep, MutationStep, StepContext};
use crate::utility::fs::walk::{WalkOptions, find_files};

/// Files dropped along with the binary entry point, relative to the root.
const BINARY_FILES: [&str; 3] = ["Dockerfile", ".goreleaser.yml", ".github/workflows/docker.yml"];

/// Regenerates derived files once the binary is gone.
const REGENERATE_SCRIPT: &str = "make generate go.depaware-update\nmake tidy\n";

/// Turns a binary project generated from the template into a library.
///
/// Deletes `main*.go` and packaging files, strips binary-only Makefile
/// variables and the `generate:` block, then regenerates derived files.
#[derive(Debug, Clone)]
pub struct RemoveGoBinaryStep {
    script: String,
}

impl RemoveGoBinaryStep {
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: REGENERATE_SCRIPT.to_string(),
        }
    }

    /// Replaces the regeneration script run after the file edits.
    #[must_use]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }
}

impl Default for RemoveGoBinaryStep {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MutationStep for RemoveGoBinaryStep {
    fn name(&self) -> &str {
        "remove-go-binary"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        let root = ctx.root();

        let options = WalkOptions::builder().with_max_depth(1).build();
        for main in find_files(root, "main*.go", &options)? {
            debug!(path = %main.display(), "remove");
            tokio::fs::remove_file(&main)
                .await
                .with_context(|| format!("failed to remove {}", main.display()))?;
        }

        let makefile = root.join("Makefile");
        let content = tokio::fs::read_to_string(&makefile)
            .await
            .with_context(|| format!("failed to read {}", makefile.display()))?;
        let stripped = strip_makefile(&content)?;
        if stripped != content {
            tokio::fs::write(&makefile, stripped)
                .await
                .with_context(|| format!("failed to write {}", makefile.display()))?;
        }

        for file in BINARY_FILES {
            let path = root.join(file);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "remove"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err).with_context(|| format!("failed to remove {}", path.display()));
                }
            }
        }

        CommandStep::shell(self.name(), self.script.as_str())
            .apply(ctx)
            .await
    }
}

/// Drops `DOCKER_IMAGE`, `GOBINS` and `NPM_PACKAGES` assignments and the
/// `generate:` block (up to its `.PHONY: generate` line and blank line).
///
/// # Errors
///
/// Returns an error if a pattern fails to compile.
pub fn strip_makefile(content: &str) -> anyhow::Result<String> {
    let variables = Regex::new(r"(?m)^(DOCKER_IMAGE|GOBINS|NPM_PACKAGES) .=.*\n")
        .context("failed to compile Makefile regex")?;
    let generate = Regex::new(r"(?ms)^generate:.*.PHONY: generate\n\n")
        .context("failed to compile Makefile regex")?;
    let text = variables.replace_all(content, "");
    Ok(generate.replace_all(&text, "").into_owned())
}

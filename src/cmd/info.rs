// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `info` command (alias `doctor`): discovery only, nothing is modified.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{coordinator, require_paths};
use crate::cli::PathArgs;
use crate::config::Config;
use crate::error::RepomanResult;
use crate::git::{RepoBackend, ShellBackend, discover};

/// Discovers `path` and renders the project as pretty JSON.
///
/// # Errors
///
/// Returns the discovery error, or an error if serialization fails.
pub async fn describe(path: &str, backend: &dyn RepoBackend) -> RepomanResult<String> {
    let project = discover(Path::new(path), backend).await?;
    let json = serde_json::to_string_pretty(&project).context("failed to serialize project")?;
    Ok(json)
}

/// Prints one JSON document per repository on stdout.
///
/// # Errors
///
/// Returns a usage error for an empty path list, or the per-path failures.
pub async fn run_info_command(
    args: &PathArgs,
    config: &Config,
    cancel: CancellationToken,
) -> RepomanResult<()> {
    require_paths(&args.paths)?;
    let backend: Arc<dyn RepoBackend> = Arc::new(ShellBackend);
    coordinator(config, cancel)
        .run(&args.paths, move |path, _token| {
            let backend = Arc::clone(&backend);
            async move {
                let json = describe(&path, backend.as_ref()).await?;
                println!("{json}");
                Ok(())
            }
        })
        .await
}

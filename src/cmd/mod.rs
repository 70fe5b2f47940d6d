// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> Coordinator (one task per path)
//!   info, maintenance, template-post-clone, assets-config
//!
//! maintenance / template-post-clone:
//!   Pipeline = discover -> prepare -> steps -> publish
//! ```

pub mod assets;
pub mod info;
pub mod maintenance;
pub mod pipeline;
pub mod template;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::{RepomanResult, usage};
use crate::git::{RepoBackend, ShellBackend};
use crate::github::GitHubClient;
use crate::project::ProjectOptions;
use crate::publish::{BotIdentity, ChangePublisher};

pub use pipeline::Pipeline;

/// Coordinator sized from `runner.concurrency`, cancelled through `cancel`.
#[must_use]
pub fn coordinator(config: &Config, cancel: CancellationToken) -> Coordinator {
    Coordinator::new(config.runner.effective_concurrency()).with_cancel_token(cancel)
}

/// Fails with a usage error before any credentials are read.
///
/// # Errors
///
/// Returns [`crate::error::RepomanError::Usage`] when `paths` is empty.
pub fn require_paths(paths: &[String]) -> RepomanResult<()> {
    if paths.is_empty() {
        return Err(usage("at least one repository path is required"));
    }
    Ok(())
}

/// Pipeline over the git CLI, with a GitHub host when pull requests are enabled.
///
/// # Errors
///
/// Returns a publish error when pull requests are enabled and the bot
/// credentials cannot be loaded.
pub fn shell_pipeline(config: &Config, options: ProjectOptions) -> RepomanResult<Pipeline> {
    let backend: Arc<dyn RepoBackend> = Arc::new(ShellBackend);
    let mut publisher = ChangePublisher::new(Arc::clone(&backend));
    if options.open_pr {
        let identity = BotIdentity::load(&config.bot, &config.hub_config_path())?;
        let client = GitHubClient::new(config.github.api_url.clone(), identity.token.clone());
        publisher = publisher.with_host(Arc::new(client)).with_identity(identity);
    }
    Ok(Pipeline::new(
        backend,
        config.compat.markers.clone(),
        publisher,
        options,
    ))
}

/// Runs `pipeline` on every path.
///
/// # Errors
///
/// Returns the coordinator's aggregate error when any repository failed.
pub async fn run_pipeline(
    pipeline: Pipeline,
    paths: &[String],
    config: &Config,
    cancel: CancellationToken,
) -> RepomanResult<()> {
    let pipeline = Arc::new(pipeline);
    coordinator(config, cancel)
        .run(paths, move |path, token| {
            let pipeline = Arc::clone(&pipeline);
            async move { pipeline.run(&path, token).await.map(|_| ()) }
        })
        .await
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `assets-config` command.
//!
//! ```text
//! path --discover--> owner/name --GET releases--> build_asset_config --> JSON
//! ```

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{coordinator, require_paths};
use crate::assets::{AssetConfig, build_asset_config};
use crate::cli::PathArgs;
use crate::config::Config;
use crate::error::{RepomanError, RepomanResult};
use crate::git::{RepoBackend, ShellBackend, discover};
use crate::github::GitHubClient;
use crate::publish::BotIdentity;

/// Release aliases of the GitHub repository behind `path`.
///
/// # Errors
///
/// Returns the discovery error, an error when `path` is not a git project,
/// or the API error of the release listing.
pub async fn asset_config_for(
    path: &str,
    backend: &dyn RepoBackend,
    client: &GitHubClient,
) -> RepomanResult<AssetConfig> {
    let project = discover(Path::new(path), backend).await?;
    let git = project.git.as_ref().ok_or_else(|| {
        RepomanError::Other(format!("not a git project: {:?}", project.path).into_boxed_str())
    })?;
    let releases = client.list_releases(&git.repo_owner, &git.repo_name).await?;
    debug!(project = %project.label(), releases = releases.len(), "listed releases");
    Ok(build_asset_config(&releases))
}

/// Prints the asset configuration of every repository on stdout.
///
/// The bot token is used when available; public repositories work without it.
///
/// # Errors
///
/// Returns a usage error for an empty path list, or the per-path failures.
pub async fn run_assets_command(
    args: &PathArgs,
    config: &Config,
    cancel: CancellationToken,
) -> RepomanResult<()> {
    require_paths(&args.paths)?;

    let token = match BotIdentity::load(&config.bot, &config.hub_config_path()) {
        Ok(identity) => identity.token,
        Err(e) => {
            debug!(error = %e, "no bot token, using anonymous API access");
            None
        }
    };
    let client = Arc::new(GitHubClient::new(config.github.api_url.clone(), token));
    let backend: Arc<dyn RepoBackend> = Arc::new(ShellBackend);

    coordinator(config, cancel)
        .run(&args.paths, move |path, _token| {
            let backend = Arc::clone(&backend);
            let client = Arc::clone(&client);
            async move {
                let json = asset_config_for(&path, backend.as_ref(), &client)
                    .await?
                    .to_json()?;
                println!("{json}");
                Ok(())
            }
        })
        .await
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `maintenance` command.

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{require_paths, run_pipeline, shell_pipeline};
use crate::cli::maintenance::MaintenanceArgs;
use crate::config::Config;
use crate::error::RepomanResult;
use crate::steps::maintenance_steps;

/// Commit and pull request title.
pub const MAINTENANCE_TITLE: &str = "chore: repo maintenance 🤖";

/// Branch suffix appended to `bot.branch_prefix`.
pub const MAINTENANCE_BRANCH: &str = "maintenance";

/// Runs the maintenance pipeline on every path.
///
/// # Errors
///
/// Returns a usage error for an empty path list, a publish error when bot
/// credentials are needed but missing, or the per-path failures.
pub async fn run_maintenance_command(
    args: &MaintenanceArgs,
    config: &Config,
    cancel: CancellationToken,
) -> RepomanResult<()> {
    require_paths(&args.paths)?;

    let options = args.project.resolve(config.project_options());
    let bump_deps = args.bump_deps(&config.maintenance);
    let standard = args.standard(&config.maintenance);
    info!(?options, bump_deps, standard, "maintenance");

    let pipeline = shell_pipeline(config, options)?
        .with_steps(maintenance_steps(config, bump_deps, standard))
        .with_change(config.bot.branch(MAINTENANCE_BRANCH), MAINTENANCE_TITLE);
    run_pipeline(pipeline, &args.paths, config, cancel).await
}

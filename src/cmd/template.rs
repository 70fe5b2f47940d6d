// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `template-post-clone` command.

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{require_paths, run_pipeline, shell_pipeline};
use crate::cli::template::TemplateArgs;
use crate::config::Config;
use crate::error::RepomanResult;
use crate::steps::template_steps;

pub const TEMPLATE_TITLE: &str = "chore: template post clone 🤖";

pub const TEMPLATE_BRANCH: &str = "template-post-clone";

/// Rewrites freshly generated repositories and proposes the result.
///
/// # Errors
///
/// Same as [`super::maintenance::run_maintenance_command`].
pub async fn run_template_command(
    args: &TemplateArgs,
    config: &Config,
    cancel: CancellationToken,
) -> RepomanResult<()> {
    require_paths(&args.paths)?;

    let options = args.project.resolve(config.project_options());
    let (name, owner) = args.template(&config.template);
    let remove_go_binary = args.remove_go_binary(&config.template);
    info!(
        ?options,
        template_name = name,
        template_owner = owner,
        remove_go_binary,
        "template post clone"
    );

    let pipeline = shell_pipeline(config, options)?
        .with_steps(template_steps(name, owner, remove_go_binary))
        .with_change(config.bot.branch(TEMPLATE_BRANCH), TEMPLATE_TITLE);
    run_pipeline(pipeline, &args.paths, config, cancel).await
}

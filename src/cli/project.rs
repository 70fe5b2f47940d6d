// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace/publication switches shared by mutating commands.
//!
//! Each switch has a `--no-` twin; the last one given wins and an absent
//! pair falls back to the configured default.

use clap::Args;

use crate::project::ProjectOptions;

#[derive(Debug, Clone, Default, Args)]
pub struct ProjectFlags {
    /// Switch to the main branch before applying the changes
    #[arg(long, overrides_with = "no_checkout_main_branch")]
    pub checkout_main_branch: bool,
    #[arg(long, overrides_with = "checkout_main_branch", hide = true)]
    pub no_checkout_main_branch: bool,

    /// Fetch origin before applying the changes
    #[arg(long, overrides_with = "no_fetch")]
    pub fetch: bool,
    #[arg(long, overrides_with = "fetch", hide = true)]
    pub no_fetch: bool,

    /// Display git diff of the changes
    #[arg(long, overrides_with = "no_show_diff")]
    pub show_diff: bool,
    #[arg(long, overrides_with = "show_diff", hide = true)]
    pub no_show_diff: bool,

    /// Open a new pull-request with the changes
    #[arg(long, overrides_with = "no_open_pr")]
    pub open_pr: bool,
    #[arg(long, overrides_with = "open_pr", hide = true)]
    pub no_open_pr: bool,

    /// Reset dirty worktree before applying the changes
    #[arg(long, overrides_with = "no_reset")]
    pub reset: bool,
    #[arg(long, overrides_with = "reset", hide = true)]
    pub no_reset: bool,
}

/// `--x` wins, then `--no-x`, then the default.
pub(crate) const fn switch(yes: bool, no: bool, default: bool) -> bool {
    if yes {
        true
    } else if no {
        false
    } else {
        default
    }
}

impl ProjectFlags {
    #[must_use]
    pub const fn resolve(&self, defaults: ProjectOptions) -> ProjectOptions {
        ProjectOptions {
            checkout_main_branch: switch(
                self.checkout_main_branch,
                self.no_checkout_main_branch,
                defaults.checkout_main_branch,
            ),
            fetch: switch(self.fetch, self.no_fetch, defaults.fetch),
            reset: switch(self.reset, self.no_reset, defaults.reset),
            show_diff: switch(self.show_diff, self.no_show_diff, defaults.show_diff),
            open_pr: switch(self.open_pr, self.no_open_pr, defaults.open_pr),
        }
    }
}

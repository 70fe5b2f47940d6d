// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::Args;

use super::project::{ProjectFlags, switch};
use crate::config::types::MaintenanceConfig;

/// Arguments for `maintenance`.
#[derive(Debug, Clone, Default, Args)]
pub struct MaintenanceArgs {
    #[command(flatten)]
    pub project: ProjectFlags,

    /// Bump dependencies
    #[arg(long, overrides_with = "no_bump_deps")]
    pub bump_deps: bool,
    #[arg(long, overrides_with = "bump_deps", hide = true)]
    pub no_bump_deps: bool,

    /// Standard maintenance tasks (template files, copyright, lint version)
    #[arg(long = "std", overrides_with = "no_standard")]
    pub standard: bool,
    #[arg(long = "no-std", overrides_with = "standard", hide = true)]
    pub no_standard: bool,

    /// Repository checkouts (duplicates are processed once)
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

impl MaintenanceArgs {
    #[must_use]
    pub const fn bump_deps(&self, defaults: &MaintenanceConfig) -> bool {
        switch(self.bump_deps, self.no_bump_deps, defaults.bump_deps)
    }

    #[must_use]
    pub const fn standard(&self, defaults: &MaintenanceConfig) -> bool {
        switch(self.standard, self.no_standard, defaults.standard)
    }
}

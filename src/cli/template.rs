// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::Args;

use super::project::{ProjectFlags, switch};
use crate::config::types::TemplateConfig;

/// Arguments for `template-post-clone`.
#[derive(Debug, Clone, Default, Args)]
pub struct TemplateArgs {
    #[command(flatten)]
    pub project: ProjectFlags,

    /// Template's name (to change with the new project's name)
    #[arg(long, value_name = "NAME")]
    pub template_name: Option<String>,

    /// Template owner's name (to change with the new owner)
    #[arg(long, value_name = "OWNER")]
    pub template_owner: Option<String>,

    /// Delete everything related to the go binary and only keep a library
    #[arg(long, overrides_with = "no_rm_go_binary")]
    pub rm_go_binary: bool,
    #[arg(long, overrides_with = "rm_go_binary", hide = true)]
    pub no_rm_go_binary: bool,

    /// Repository checkouts (duplicates are processed once)
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

impl TemplateArgs {
    /// Template name and owner with config fallbacks.
    #[must_use]
    pub fn template<'a>(&'a self, defaults: &'a TemplateConfig) -> (&'a str, &'a str) {
        (
            self.template_name.as_deref().unwrap_or(&defaults.name),
            self.template_owner.as_deref().unwrap_or(&defaults.owner),
        )
    }

    #[must_use]
    pub const fn remove_go_binary(&self, defaults: &TemplateConfig) -> bool {
        switch(self.rm_go_binary, self.no_rm_go_binary, defaults.remove_go_binary)
    }
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: ProjectConfig, CompatConfig, BotConfig, MaintenanceConfig,
//!         TemplateConfig, GithubConfig, RunnerConfig, LogSection
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Defaults for the per-repository pipeline flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub checkout_main_branch: bool,
    pub fetch: bool,
    pub show_diff: bool,
    pub open_pr: bool,
    pub reset: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            checkout_main_branch: true,
            fetch: true,
            show_diff: true,
            open_pr: true,
            reset: false,
        }
    }
}

/// Files a project must carry to be maintained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompatConfig {
    pub markers: Vec<String>,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            markers: vec!["Makefile".to_string(), "rules.mk".to_string()],
        }
    }
}

/// Bot identity used for commits and pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Commit author and committer name.
    pub name: String,
    /// Commit author and committer email.
    pub email: String,
    /// Hub credentials file, relative to `$HOME/.config`.
    pub hub_config: String,
    /// Prefix for maintenance branch names.
    pub branch_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "moul-bot".to_string(),
            email: "bot@moul.io".to_string(),
            hub_config: "hub-moul-bot".to_string(),
            branch_prefix: "dev/moul".to_string(),
        }
    }
}

impl BotConfig {
    /// Full branch name for a maintenance kind, e.g. `dev/moul/maintenance`.
    #[must_use]
    pub fn branch(&self, kind: &str) -> String {
        let prefix = self.branch_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            kind.to_string()
        } else {
            format!("{prefix}/{kind}")
        }
    }
}

/// `maintenance` subcommand defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaintenanceConfig {
    pub bump_deps: bool,
    pub standard: bool,
    /// Program and arguments run by the dependency bump step.
    pub bump_deps_command: Vec<String>,
    /// Target golangci-lint version for workflow files.
    pub lint_version: String,
    /// Template checkout providing renovate/dependabot files (`~` expands to `$HOME`).
    pub template_dir: String,
    /// Upstream `rules.mk` copied over a project's own.
    pub rules_mk: String,
    /// Regenerates `AUTHORS` in projects using `rules.mk`.
    pub authors_command: Vec<String>,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            bump_deps: false,
            standard: true,
            bump_deps_command: vec![
                "go".to_string(),
                "get".to_string(),
                "-u".to_string(),
                "./...".to_string(),
            ],
            lint_version: "v1.38".to_string(),
            template_dir: "~/go/src/moul.io/golang-repo-template".to_string(),
            rules_mk: "~/go/src/moul.io/rules.mk/rules.mk".to_string(),
            authors_command: vec!["make".to_string(), "generate.authors".to_string()],
        }
    }
}

/// `template-post-clone` subcommand defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub name: String,
    pub owner: String,
    pub remove_go_binary: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            name: "golang-repo-template".to_string(),
            owner: "moul".to_string(),
            remove_go_binary: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
        }
    }
}

/// Fan-out settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Maximum repositories processed at once; 0 means available parallelism.
    pub concurrency: usize,
}

impl RunnerConfig {
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrency > 0 {
            return self.concurrency;
        }
        std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

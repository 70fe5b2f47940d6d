// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for repoman-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. ~/.config/repoman/repoman.toml
//! 3. ./repoman.toml
//! 4. --config (repeatable)
//! 5. REPOMAN_* env vars
//! 6. CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! REPOMAN_PROJECT__OPEN_PR=false      → project.open_pr = false
//! REPOMAN_RUNNER__CONCURRENCY=8       → runner.concurrency = 8
//! REPOMAN_COMPAT__MARKERS=Makefile    → compat.markers = ["Makefile"]
//! ```

pub mod loader;
pub mod types;


use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::project::ProjectOptions;

use loader::ConfigLoader;
use types::{
    BotConfig, CompatConfig, GithubConfig, LogSection, MaintenanceConfig, ProjectConfig,
    RunnerConfig, TemplateConfig,
};

/// Env var prefix for configuration overrides.
pub const ENV_PREFIX: &str = "REPOMAN";

/// Config file name looked up in `~/.config/repoman/` and the working directory.
pub const CONFIG_FILE_NAME: &str = "repoman.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project: ProjectConfig,
    pub compat: CompatConfig,
    pub bot: BotConfig,
    pub maintenance: MaintenanceConfig,
    pub template: TemplateConfig,
    pub github: GithubConfig,
    pub runner: RunnerConfig,
    pub log: LogSection,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repoman_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .layer_file_if_present("repoman.toml")
    ///     .with_env_prefix("REPOMAN")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Loader with every file layer and the env prefix registered, ready for
    /// CLI overrides via [`ConfigLoader::set`].
    #[must_use]
    pub fn layered(explicit: &[PathBuf]) -> ConfigLoader {
        let mut loader = Self::builder();
        if let Some(home) = home_dir() {
            loader = loader.layer_file_if_present(
                home.join(".config").join("repoman").join(CONFIG_FILE_NAME),
            );
        }
        loader = loader.layer_file_if_present(CONFIG_FILE_NAME);
        for file in explicit {
            loader = loader.layer_file(file);
        }
        loader.with_env_prefix(ENV_PREFIX)
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().layer_toml(content).build()
    }

    /// Rejects values the pipeline cannot act on.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let lint_version =
            Regex::new(r"^v1\.\d+$").context("failed to compile lint version regex")?;
        if !lint_version.is_match(&self.maintenance.lint_version) {
            return Err(ConfigError::InvalidValue {
                section: "maintenance".to_string(),
                key: "lint_version".to_string(),
                message: format!(
                    "expected a version like 'v1.38', got '{}'",
                    self.maintenance.lint_version
                ),
            }
            .into());
        }
        for (key, argv) in [
            ("bump_deps_command", &self.maintenance.bump_deps_command),
            ("authors_command", &self.maintenance.authors_command),
        ] {
            if argv.is_empty() {
                return Err(ConfigError::MissingKey {
                    section: "maintenance".to_string(),
                    key: key.to_string(),
                }
                .into());
            }
        }
        if let Err(e) = reqwest::Url::parse(&self.github.api_url) {
            return Err(ConfigError::InvalidValue {
                section: "github".to_string(),
                key: "api_url".to_string(),
                message: e.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Pipeline flag defaults before CLI overrides.
    #[must_use]
    pub const fn project_options(&self) -> ProjectOptions {
        ProjectOptions {
            checkout_main_branch: self.project.checkout_main_branch,
            fetch: self.project.fetch,
            reset: self.project.reset,
            show_diff: self.project.show_diff,
            open_pr: self.project.open_pr,
        }
    }

    /// Template checkout directory with `~` expanded.
    #[must_use]
    pub fn template_dir(&self) -> PathBuf {
        expand_home(&self.maintenance.template_dir)
    }

    #[must_use]
    pub fn rules_mk_source(&self) -> PathBuf {
        expand_home(&self.maintenance.rules_mk)
    }

    /// Location of the hub credentials file for the bot.
    #[must_use]
    pub fn hub_config_path(&self) -> PathBuf {
        let relative = Path::new(&self.bot.hub_config);
        if relative.is_absolute() {
            return relative.to_path_buf();
        }
        home_dir()
            .unwrap_or_default()
            .join(".config")
            .join(relative)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expands a leading `~/` to `$HOME`.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

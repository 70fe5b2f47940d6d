// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layer stacking on top of the `config` crate.
//!
//! ```text
//! ConfigLoader::new()
//!   .layer_file(path)             must exist
//!   .layer_file_if_present(path)  skipped when absent
//!   .layer_toml(str)
//!   .with_env_prefix("REPOMAN")   applied last, above every file
//!   .set(key, value)              CLI flags, above everything
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::path::Path;

use config::{ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};

use super::Config;
use crate::error::Result;

/// Keys whose env values are comma-separated lists.
const ENV_LIST_KEYS: [&str; 3] = [
    "compat.markers",
    "maintenance.bump_deps_command",
    "maintenance.authors_command",
];

/// Stacks configuration layers, later layers winning.
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
        }
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        self
    }

    /// Adds a TOML file that must exist (`--config`).
    #[must_use]
    pub fn layer_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Adds a TOML file that is silently skipped when missing.
    #[must_use]
    pub fn layer_file_if_present(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    #[must_use]
    pub fn layer_toml(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self
    }

    /// Reads `PREFIX_SECTION__KEY` variables, e.g. `REPOMAN_PROJECT__OPEN_PR=false`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Overrides a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key path is malformed.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("config override {key}: {e}"))?;
        Ok(self)
    }

    /// Merges every layer and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error when a required file is missing, a layer is not valid
    /// TOML, a value has the wrong type, or [`Config::validate`] rejects it.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => {
                let env = ENV_LIST_KEYS.iter().fold(
                    Environment::with_prefix(prefix)
                        .prefix_separator("_")
                        .separator("__")
                        .list_separator(","),
                    |env, key| env.with_list_parse_key(key),
                );
                self.builder.add_source(env.try_parsing(true))
            }
            None => self.builder,
        };
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! -v, --verbose     ← Console level at least debug
//! --log-level N     ← Console verbosity (0-5)
//! --log-file FILE   ← log.file override
//! -j, --jobs N      ← runner.concurrency override
//!
//! Precedence: CLI flags > env > --config > ./repoman.toml > ~/.config > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times; later files win.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        action = clap::ArgAction::Append
    )]
    pub configs: Vec<PathBuf>,

    /// Verbose mode (debug logging).
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Maximum number of repositories processed at once (0 = CPU count).
    #[arg(short = 'j', long = "jobs", value_name = "N", global = true)]
    pub jobs: Option<usize>,
}

impl GlobalOptions {
    /// Applies the flags that shadow configuration keys.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be stored.
    pub fn apply_overrides(&self, mut loader: ConfigLoader) -> Result<ConfigLoader> {
        if let Some(level) = self.log_level {
            loader = loader.set("log.level", i64::from(level))?;
        }
        if let Some(path) = &self.log_file {
            loader = loader.set("log.file", path.display().to_string())?;
        }
        if let Some(jobs) = self.jobs {
            let jobs = i64::try_from(jobs).unwrap_or(i64::MAX);
            loader = loader.set("runner.concurrency", jobs)?;
        }
        Ok(loader)
    }
}

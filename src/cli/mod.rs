// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for repoman-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! repoman [global options] <command>
//! info <path...>                         (alias: doctor)
//! maintenance [opts] <path...>
//! template-post-clone [opts] <path...>
//! assets-config <path...>
//! version
//! ```

pub mod global;
pub mod maintenance;
pub mod project;
pub mod template;


use crate::cli::global::GlobalOptions;
use crate::cli::maintenance::MaintenanceArgs;
use crate::cli::template::TemplateArgs;
use clap::{Args, Parser, Subcommand};

/// Batch repository maintenance.
#[derive(Debug, Parser)]
#[command(
    name = "repoman",
    author,
    version,
    about = "Repository Maintenance Tool",
    long_about = "repoman-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Prepares, mutates and publishes many git checkouts at once.\n\
                  Every command takes one or more repository paths; each path is\n\
                  processed independently and failures are reported per path.",
    after_help = "CONFIGURATION:\n\n\
                  Defaults are read from ~/.config/repoman/repoman.toml, then\n\
                  ./repoman.toml, then every --config file in order, then\n\
                  REPOMAN_SECTION__KEY environment variables. Command-line flags\n\
                  win over all of them."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the discovered state of each project as JSON (read-only).
    #[command(visible_alias = "doctor")]
    Info(PathArgs),

    /// Performs maintenance tasks and proposes them as a pull request.
    Maintenance(MaintenanceArgs),

    /// Replaces template placeholders in freshly generated repositories.
    #[command(name = "template-post-clone")]
    TemplatePostClone(TemplateArgs),

    /// Generates release alias configuration for assets.
    #[command(name = "assets-config")]
    AssetsConfig(PathArgs),

    /// Shows the version.
    Version,
}

impl Command {
    /// One-line usage shown when a command is run without paths.
    #[must_use]
    pub const fn short_usage(&self) -> &'static str {
        match self {
            Self::Info(_) => "repoman info [opts] <path...>",
            Self::Maintenance(_) => "repoman maintenance [opts] <path...>",
            Self::TemplatePostClone(_) => "repoman template-post-clone [opts] <path...>",
            Self::AssetsConfig(_) => "repoman assets-config [opts] <path...>",
            Self::Version => "repoman version",
        }
    }
}

/// Repository paths processed by a command.
#[derive(Debug, Clone, Default, Args)]
pub struct PathArgs {
    /// Repository checkouts (duplicates are processed once)
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder for step commands.
//!
//! ```text
//! ProcessBuilder
//!  • new(program)
//!  • args/cwd/name
//!  • stdout_to_stderr
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Output from a completed process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOutput {
    exit_code: i32,
    interrupted: bool,
}

impl ProcessOutput {
    pub(super) const fn new(exit_code: i32, interrupted: bool) -> Self {
        Self {
            exit_code,
            interrupted,
        }
    }

    pub(super) const fn interrupted() -> Self {
        Self::new(-1, true)
    }

    /// Returns the process exit code (0 = success, -1 when killed by a signal).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0 && !self.interrupted
    }
}

/// Builder for configuring and running a process.
///
/// The child inherits the parent environment and stderr; stdin is closed.
#[derive(Debug)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    stdout_to_stderr: bool,
    /// Display name for logging
    name: Option<String>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// A bare executable name is resolved via PATH when the process spawns.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            stdout_to_stderr: false,
            name: None,
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sends the child's stdout to our stderr, keeping our stdout for
    /// machine-readable output.
    #[must_use]
    pub const fn stdout_to_stderr(mut self) -> Self {
        self.stdout_to_stderr = true;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) const fn redirects_stdout(&self) -> bool {
        self.stdout_to_stderr
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, cwd, stdio
//!              |
//!              v
//!          spawn()
//!              |
//!        wait()  <select>  token.cancelled()
//!              |                     |
//!              |              drop child (kill_on_drop)
//!              v                     v
//!    validate exit_code      interrupted output
//!              |
//!              v
//!       ProcessOutput
//! ```

use std::fmt::Write as _;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, ProcessOutput};
use crate::error::ProcessError;

impl ProcessBuilder {
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    pub(crate) fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(char::is_whitespace) {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process and waits for completion or cancellation.
    ///
    /// When the token fires the child is killed and the returned output has
    /// `is_interrupted() == true`. A token that is already cancelled never
    /// spawns anything.
    ///
    /// # Errors
    ///
    /// Returns an error if spawning fails or the process exits with a
    /// non-zero status.
    pub async fn run_with_cancellation(
        self,
        token: CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Ok(ProcessOutput::interrupted());
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = tokio::select! {
            result = child.wait() => {
                let status = result.map_err(|source| ProcessError::SpawnFailed {
                    command: cmd_line.clone(),
                    source,
                })?;
                ProcessOutput::new(status.code().unwrap_or(-1), false)
            }
            () = token.cancelled() => {
                debug!(process = %name, "cancelled, killing");
                ProcessOutput::interrupted()
            }
        };

        if !output.is_interrupted() && !output.success() {
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
            });
        }

        trace!(
            process = %name,
            exit_code = output.exit_code(),
            interrupted = output.is_interrupted(),
            "completed"
        );
        Ok(output)
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());
        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        command.stdin(Stdio::null());
        command.stdout(if self.redirects_stdout() {
            Stdio::from(std::io::stderr())
        } else {
            Stdio::inherit()
        });
        command.stderr(Stdio::inherit());
        command.kill_on_drop(true);
        command
    }
}

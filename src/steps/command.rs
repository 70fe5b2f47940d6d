// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use async_trait::async_trait;

use super::{MutationStep, StepContext};
use crate::core::process::builder::ProcessBuilder;
use crate::error::ProcessError;

/// Runs a subprocess in the project directory.
///
/// The child's stdout is routed to stderr; a non-zero exit or a
/// cancellation fails the step.
#[derive(Debug, Clone)]
pub struct CommandStep {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandStep {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits `argv` into program and arguments.
    #[must_use]
    pub fn from_argv(name: impl Into<String>, argv: &[String]) -> Self {
        let (program, args) = argv.split_first().map_or_else(
            || (String::new(), Vec::new()),
            |(program, args)| (program.clone(), args.to_vec()),
        );
        Self {
            name: name.into(),
            program,
            args,
        }
    }

    /// Runs `script` with `/bin/sh -xec`.
    pub fn shell(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self::new(name, "/bin/sh", ["-xec".to_string(), script.into()])
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl MutationStep for CommandStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        if self.program.is_empty() {
            anyhow::bail!("no command configured");
        }
        let builder = ProcessBuilder::new(&self.program)
            .args(&self.args)
            .cwd(ctx.path())
            .name(&self.name)
            .stdout_to_stderr();
        let command = builder.command_line();
        let output = builder
            .run_with_cancellation(ctx.cancel_token().clone())
            .await?;
        if output.is_interrupted() {
            return Err(ProcessError::Interrupted { command }.into());
        }
        Ok(())
    }
}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning for mutation steps.
//!
//! ```text
//! ProcessBuilder::new("go")
//!   .args() .cwd() .name() .stdout_to_stderr()
//!   .run_with_cancellation(token)
//!       --> tokio::process::Command (kill_on_drop)
//!       --> ProcessOutput { exit_code, interrupted }
//! ```

pub mod builder;
mod runner;

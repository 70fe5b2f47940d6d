// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        info / maintenance / template
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |        coordinator        |
//!              |  one task per repository  |
//!              '-------------+-------------'
//!                            v
//!   discovery --> workspace --> steps --> publish
//!   (git)        (preparer)   (mutation)  (branch, commit, PR)
//!      |                         |           |
//!      v                         v           v
//!   RepoBackend              core::process  github
//!   gix reads / git CLI      subprocesses   REST client
//!
//!   +-----------------------------------------------+
//!   |  foundation   config, error, logging, utility |
//!   +-----------------------------------------------+
//! ```

pub mod assets;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod coordinator;
pub mod core;
pub mod error;
pub mod git;
pub mod github;
pub mod logging;
pub mod project;
pub mod publish;
pub mod steps;
pub mod utility;
pub mod workspace;

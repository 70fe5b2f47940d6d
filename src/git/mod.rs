// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git access for the maintenance pipeline.
//!
//! ```text
//!   discovery.rs      remote_url.rs
//!   (Project)         (owner/name)
//!        \               /
//!         v             v
//!      ,------------------,
//!      | backend (trait)  |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!   ShellBackend  FakeBackend
//!   gix reads     in-memory
//!   git CLI       (tests)
//! ```

pub mod backend;
pub mod discovery;
pub mod remote_url;

pub use backend::{
    CommitIdentity, CommitMessage, RepoBackend, ShellBackend, SyncOutcome, WorktreeStatus,
    tolerate_up_to_date,
};
pub use discovery::{ORIGIN, discover, find_git_root};
pub use remote_url::{RemoteRepo, parse_remote_url};

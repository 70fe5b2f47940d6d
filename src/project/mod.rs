// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Project state records.
//!
//! ```text
//! Project
//!   path ──────── user-supplied directory (absolute)
//!   git ───────── Option<GitState>
//!                   root, branches, origin, dirty flag, metadata
//! ```
//!
//! Plain data only. Live repository access goes through
//! [`crate::git::RepoBackend`].

use serde::Serialize;
use std::path::PathBuf;

/// One local checkout being inspected or maintained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Absolute path given by the user (may be a subdirectory of the git root).
    pub path: PathBuf,
    /// Git state; `None` when no ancestor carries a `.git` entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitState>,
}

impl Project {
    #[must_use]
    pub const fn is_git(&self) -> bool {
        self.git.is_some()
    }

    /// Short label for logs: `owner/name` when known, otherwise the path.
    #[must_use]
    pub fn label(&self) -> String {
        self.git.as_ref().map_or_else(
            || self.path.display().to_string(),
            |git| format!("{}/{}", git.repo_owner, git.repo_name),
        )
    }
}

/// Git facts discovered for a [`Project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitState {
    /// Nearest ancestor of the project path containing `.git`.
    pub root: PathBuf,
    /// Short name of HEAD; `None` when detached.
    pub current_branch: Option<String>,
    /// Default branch of `origin`, e.g. `main`.
    pub main_branch: String,
    pub origin_remotes: Vec<String>,
    pub clone_url: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub html_url: String,
    pub in_main_branch: bool,
    pub is_dirty: bool,
    pub metadata: ProjectMetadata,
}

impl GitState {
    /// Recomputes `in_main_branch` from the branch names.
    ///
    /// Both names must be known and non-empty; comparison is case-sensitive.
    pub fn refresh_in_main_branch(&mut self) {
        self.in_main_branch = match self.current_branch.as_deref() {
            Some(current) if !current.is_empty() && !self.main_branch.is_empty() => {
                current == self.main_branch
            }
            _ => false,
        };
    }
}

/// Read-only facts about the project contents, reported by `info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectMetadata {
    pub has_docker: bool,
    pub has_binary: bool,
    pub has_go: bool,
    pub has_library: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_mod_path: Option<String>,
}

/// Per-run pipeline switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProjectOptions {
    pub checkout_main_branch: bool,
    pub fetch: bool,
    pub reset: bool,
    pub show_diff: bool,
    pub open_pr: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            checkout_main_branch: true,
            fetch: true,
            reset: false,
            show_diff: true,
            open_pr: true,
        }
    }
}

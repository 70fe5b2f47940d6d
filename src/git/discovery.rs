// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Project discovery.
//!
//! ```text
//! path ──absolute──> is_dir? ──no──> InvalidPath
//!                      |
//!                  find_git_root (walk ancestors for .git)
//!                      |
//!           none ──────┴────── root
//!            |                   |
//!   Project { git: None }   HEAD, origin URLs, origin/HEAD
//!                           (refresh once if missing), status,
//!                           metadata
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::backend::RepoBackend;
use super::remote_url::parse_remote_url;
use crate::error::{DiscoveryError, GitError, GixError};
use crate::project::{GitState, Project, ProjectMetadata};

/// Remote whose URL and default branch identify the project.
pub const ORIGIN: &str = "origin";

/// Nearest ancestor of `path` (inclusive) containing a `.git` entry.
#[must_use]
pub fn find_git_root(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Builds a fresh [`Project`] for `path`.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidPath`] before touching git when `path` is
/// not a directory, and other variants when the repository cannot be read.
pub async fn discover(path: &Path, backend: &dyn RepoBackend) -> Result<Project, DiscoveryError> {
    let invalid = || DiscoveryError::InvalidPath {
        path: path.to_path_buf(),
    };
    let path = std::path::absolute(path).map_err(|_| invalid())?;
    if !path.is_dir() {
        return Err(DiscoveryError::InvalidPath { path });
    }

    let Some(root) = find_git_root(&path) else {
        warn!(project = %path.display(), "project is not in a git repository");
        return Ok(Project { path, git: None });
    };

    let current_branch = backend
        .current_branch(&root)
        .await
        .map_err(|e| match e {
            GitError::Gix(GixError::Discover(_)) => DiscoveryError::OpenRepository {
                root: root.clone(),
                source: e,
            },
            other => DiscoveryError::Head(other),
        })?;

    let origin_remotes = backend
        .remote_urls(&root, ORIGIN)
        .await
        .map_err(|source| DiscoveryError::OpenRepository {
            root: root.clone(),
            source,
        })?;
    let clone_url = origin_remotes
        .first()
        .cloned()
        .ok_or_else(|| DiscoveryError::RemoteNotFound {
            remote: ORIGIN.to_string(),
        })?;
    let remote = parse_remote_url(&clone_url)?;

    let main_branch = resolve_main_branch(&root, backend).await?;

    let is_dirty = backend
        .status(&root)
        .await
        .map_err(DiscoveryError::Status)?
        .is_dirty();

    let metadata = read_metadata(&path)?;

    let mut git = GitState {
        root,
        current_branch,
        main_branch,
        origin_remotes,
        clone_url,
        repo_owner: remote.owner,
        repo_name: remote.name,
        html_url: remote.html_url,
        in_main_branch: false,
        is_dirty,
        metadata,
    };
    git.refresh_in_main_branch();

    debug!(
        project = %path.display(),
        branch = ?git.current_branch,
        main = %git.main_branch,
        dirty = git.is_dirty,
        "discovered project"
    );
    Ok(Project {
        path,
        git: Some(git),
    })
}

/// Reads `origin/HEAD`, asking the remote once when it is not recorded locally.
async fn resolve_main_branch(
    root: &Path,
    backend: &dyn RepoBackend,
) -> Result<String, DiscoveryError> {
    let unresolved = |reason: String| DiscoveryError::MainBranchUnresolved {
        root: root.to_path_buf(),
        reason,
    };

    if let Some(branch) = backend
        .remote_head(root, ORIGIN)
        .await
        .map_err(|e| unresolved(e.to_string()))?
    {
        return Ok(branch);
    }

    debug!(root = %root.display(), "origin/HEAD missing, asking the remote");
    backend
        .refresh_remote_head(root, ORIGIN)
        .await
        .map_err(|e| unresolved(e.to_string()))?;

    backend
        .remote_head(root, ORIGIN)
        .await
        .map_err(|e| unresolved(e.to_string()))?
        .ok_or_else(|| unresolved(format!("{ORIGIN}/HEAD is not set")))
}

/// Derives [`ProjectMetadata`] from the files directly under `path`.
///
/// # Errors
///
/// Returns [`DiscoveryError::Metadata`] when the directory or `go.mod` cannot be read.
pub fn read_metadata(path: &Path) -> Result<ProjectMetadata, DiscoveryError> {
    let metadata_err = |p: &Path| {
        let p = p.to_path_buf();
        move |source| DiscoveryError::Metadata { path: p, source }
    };

    let has_docker = path.join("Dockerfile").is_file();
    let has_main = path.join("main.go").is_file();
    let has_binary = has_docker || has_main;

    let go_mod = path.join("go.mod");
    let go_mod_path = if go_mod.is_file() {
        let content = std::fs::read_to_string(&go_mod).map_err(metadata_err(&go_mod))?;
        module_path(&content)
    } else {
        None
    };

    let has_go = go_mod.is_file() || has_go_sources(path).map_err(metadata_err(path))?;

    Ok(ProjectMetadata {
        has_docker,
        has_binary,
        has_go,
        has_library: has_go && !has_binary,
        go_mod_path,
    })
}

fn has_go_sources(path: &Path) -> std::io::Result<bool> {
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let is_go = entry.path().extension().is_some_and(|ext| ext == "go");
        if is_go && entry.file_type()?.is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// The `module` directive of a go.mod file.
pub(crate) fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    })
}

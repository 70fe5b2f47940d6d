// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                 RepomanError (~24 bytes)
//!                        |
//!   +-------+-------+----+----+-------+-------+-------+
//!   v       v       v         v       v       v       v
//! Discovery Prepare Mutation Publish  Git  Network Config ...
//!   Box      Box     Box      Box     Box    Box    Box
//!
//! Per-repository pipeline:
//!   Discovery  InvalidPath, RemoteUrl, MainBranchUnresolved, ...
//!   Prepare    DirtyWorktree, FetchFailed, CheckoutFailed,
//!              IncompatibleProject { missing }
//!   Mutation   opaque step failure
//!   Publish    ShowDiff, Branch, Commit, Push, Identity
//!
//! Fan-out:
//!   MaintenanceFailures  path -> RepomanError, one line per repo
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`RepomanError`].
pub type RepomanResult<T> = std::result::Result<T, RepomanError>;

/// Result type for repository backend operations.
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum RepomanError {
    /// Command was invoked without the arguments it needs.
    #[error("usage error: {0}")]
    Usage(Box<str>),

    /// Project discovery failed.
    #[error("invalid project: {0}")]
    Discovery(#[from] Box<DiscoveryError>),

    /// Workspace preparation failed.
    #[error("prepare workspace: {0}")]
    Prepare(#[from] Box<PrepareError>),

    /// A mutation step failed.
    #[error("{0}")]
    Mutation(#[from] Box<MutationError>),

    /// Publishing the changes failed.
    #[error("push changes: {0}")]
    Publish(#[from] Box<PublishError>),

    /// Git operation failed outside of a pipeline stage.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// One or more repositories failed during a fan-out run.
    #[error("{0}")]
    Failures(#[from] Box<MaintenanceFailures>),

    /// The run was cancelled before this repository finished.
    #[error("cancelled")]
    Cancelled,

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a [`RepomanError::Usage`] with the given message.
pub fn usage(message: impl Into<String>) -> RepomanError {
    RepomanError::Usage(message.into().into_boxed_str())
}

impl RepomanError {
    /// Returns true if this is a usage error rather than a runtime failure.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for RepomanError {
                fn from(err: $error) -> Self {
                    RepomanError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    DiscoveryError => Discovery,
    PrepareError => Prepare,
    MutationError => Mutation,
    PublishError => Publish,
    GitError => Git,
    NetworkError => Network,
    ConfigError => Config,
    ProcessError => Process,
    MaintenanceFailures => Failures,
    std::io::Error => Io,
}

impl From<anyhow::Error> for RepomanError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}").into_boxed_str())
    }
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to resolve a reference.
    #[error("failed to get HEAD: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Failed to compute worktree status.
    #[error("failed to compute status: {0}")]
    Status(String),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Repository backend errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Failed to spawn the git executable.
    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// A fetch or pull had nothing to do.
    ///
    /// Callers treat this as success, see [`crate::git::backend::tolerate_up_to_date`].
    #[error("{operation}: already up to date")]
    AlreadyUpToDate { operation: String },

    /// Branch not found.
    #[error("branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// A blocking gix read panicked or was cancelled.
    #[error("git read task failed: {0}")]
    ReadTask(#[from] tokio::task::JoinError),
}

// --- Remote URL Errors ---

/// Failures decoding the `origin` URL into an owner/name pair.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteUrlError {
    /// URL string was empty.
    #[error("empty remote url")]
    Empty,

    /// URL could not be parsed in any supported form.
    #[error("malformed remote url: {url:?}")]
    Malformed { url: String },

    /// Host is not a recognized forge.
    #[error("unsupported remote host {host:?} in {url:?}")]
    UnsupportedHost { host: String, url: String },

    /// URL path does not name an `owner/repository` pair.
    #[error("remote url does not name a repository: {url:?}")]
    MissingRepository { url: String },
}

// --- Discovery Errors ---

/// Project discovery errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Path could not be resolved or is not a directory.
    #[error("path is not a directory: {path:?}")]
    InvalidPath { path: PathBuf },

    /// The git root could not be opened.
    #[error("failed to open git repo: {root:?}: {source}")]
    OpenRepository {
        root: PathBuf,
        #[source]
        source: GitError,
    },

    /// HEAD could not be read.
    #[error("failed to get HEAD: {0}")]
    Head(#[source] GitError),

    /// The `origin` remote is missing or has no URL.
    #[error("failed to get {remote:?} remote")]
    RemoteNotFound { remote: String },

    /// The clone URL could not be decoded.
    #[error("failed to parse the clone URL: {0}")]
    RemoteUrl(#[from] RemoteUrlError),

    /// `origin/HEAD` did not resolve, even after refreshing it.
    #[error("cannot resolve main branch of {root:?}: {reason}")]
    MainBranchUnresolved { root: PathBuf, reason: String },

    /// Worktree status could not be computed.
    #[error("update status: {0}")]
    Status(#[source] GitError),

    /// Project metadata files could not be read.
    #[error("read {path:?}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Prepare Errors ---

/// Workspace preparation errors.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// Project is not inside a git repository.
    #[error("not a git project: {path:?}")]
    NoGitRoot { path: PathBuf },

    /// Hard reset of a dirty worktree failed.
    #[error("reset worktree: {0}")]
    Reset(#[source] GitError),

    /// Worktree has uncommitted changes.
    #[error("worktree is dirty, please commit or discard changes before retrying")]
    DirtyWorktree { path: PathBuf },

    /// Fetching `origin` failed.
    #[error("failed to fetch origin: {0}")]
    FetchFailed(#[source] GitError),

    /// Switching to or pulling the main branch failed.
    #[error("failed to checkout main branch: {branch:?}: {source}")]
    CheckoutFailed {
        branch: String,
        #[source]
        source: GitError,
    },

    /// Required marker files are missing.
    #[error("project is not compatible with repoman: {}", format_missing(.missing))]
    IncompatibleProject { missing: Vec<String> },

    /// Status refresh failed.
    #[error("update status: {0}")]
    Status(#[source] GitError),
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|file| format!("missing file: {file:?}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// --- Mutation Errors ---

/// A mutation step aborted the per-repository run.
#[derive(Debug, Error)]
#[error("{step}: {source:#}")]
pub struct MutationError {
    pub step: String,
    #[source]
    pub source: anyhow::Error,
}

// --- Publish Errors ---

/// Change publication errors.
///
/// Pull-request creation failures are not represented here: they degrade to
/// listing the open pull requests.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Diff report failed.
    #[error("show diff: {0}")]
    ShowDiff(#[source] GitError),

    /// Creating the maintenance branch failed.
    #[error("create branch {branch:?}: {source}")]
    Branch {
        branch: String,
        #[source]
        source: GitError,
    },

    /// Committing the changes failed.
    #[error("commit: {0}")]
    Commit(#[source] GitError),

    /// Pushing the maintenance branch failed.
    #[error("push {branch:?}: {source}")]
    Push {
        branch: String,
        #[source]
        source: GitError,
    },

    /// No bot identity was available while a pull request was requested.
    #[error("bot identity: {0}")]
    Identity(String),

    /// Project has no git state to publish from.
    #[error("not a git project: {path:?}")]
    NoGitRoot { path: PathBuf },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process was cancelled before completion.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },
}

// --- Aggregate ---

/// Failures collected from a fan-out run, keyed by input path.
///
/// Empty means every repository succeeded; callers never construct an
/// error from an empty set.
#[derive(Debug, Default)]
pub struct MaintenanceFailures {
    failures: BTreeMap<String, RepomanError>,
}

impl MaintenanceFailures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the failure for `path`, wrapping any previous one for the same path.
    pub fn insert(&mut self, path: impl Into<String>, error: RepomanError) {
        let path = path.into();
        let error = match self.failures.remove(&path) {
            Some(previous) => RepomanError::Other(format!("{previous}; {error}").into_boxed_str()),
            None => error,
        };
        self.failures.insert(path, error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&RepomanError> {
        self.failures.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.failures.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RepomanError)> {
        self.failures.iter().map(|(path, err)| (path.as_str(), err))
    }
}

impl fmt::Display for MaintenanceFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, err)) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{path:?}: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MaintenanceFailures {}

// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! gix reads, git CLI writes.
//!
//! gix reads are synchronous and run on the blocking pool. Write operations
//! spawn `git` through `tokio::process` with `kill_on_drop`, so dropping a
//! pipeline future aborts the subprocess.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::{CommitIdentity, CommitMessage, RepoBackend, SyncOutcome, WorktreeStatus};
use crate::error::{GitError, GitResult, GixError};

/// Captured output of a successful git invocation.
struct GitOutput {
    stdout: String,
    stderr: String,
}

/// Repository backend over the local git installation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellBackend;

impl ShellBackend {
    /// Builds a git command. Sets `GCM_INTERACTIVE=never`, `GIT_TERMINAL_PROMPT=0`
    /// and a C locale so output can be matched.
    fn git_command(args: &[&str], cwd: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    async fn run(cmd: &mut Command, args: &[&str]) -> GitResult<GitOutput> {
        let command = format!("git {}", args.join(" "));
        debug!(%command, "running git");

        let output = cmd.output().await.map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            let message = if stderr.is_empty() { stdout } else { stderr };
            return Err(GitError::CommandFailed { command, message });
        }
        Ok(GitOutput { stdout, stderr })
    }

    async fn git(args: &[&str], cwd: &Path) -> GitResult<GitOutput> {
        Self::run(&mut Self::git_command(args, cwd), args).await
    }

    /// Runs a read-only report with its stdout sent to our stderr.
    async fn report(args: &[&str], cwd: &Path) -> GitResult<()> {
        let mut cmd = Self::git_command(args, cwd);
        cmd.stdout(std::io::stderr()).stderr(std::io::stderr());
        let command = format!("git {}", args.join(" "));
        let status = cmd.status().await.map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(GitError::CommandFailed {
                command,
                message: format!("exited with {status}"),
            })
        }
    }

    /// Runs a synchronous gix read on the blocking pool.
    pub(super) async fn offload<T, F>(root: &Path, read: F) -> GitResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> GitResult<T> + Send + 'static,
    {
        let root: PathBuf = root.to_path_buf();
        tokio::task::spawn_blocking(move || read(&root)).await?
    }

    fn open(root: &Path) -> GitResult<gix::Repository> {
        gix::discover(root).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))
    }

    fn read_current_branch(root: &Path) -> GitResult<Option<String>> {
        let repo = Self::open(root)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn read_config_strings(root: &Path, key: &str) -> GitResult<Vec<String>> {
        let repo = Self::open(root)?;
        let snapshot = repo.config_snapshot();
        Ok(snapshot
            .strings(key)
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    fn read_remote_head(root: &Path, remote: &str) -> GitResult<Option<String>> {
        let repo = Self::open(root)?;
        let name = format!("refs/remotes/{remote}/HEAD");
        let reference = match repo.find_reference(name.as_str()) {
            Ok(reference) => reference,
            Err(gix::reference::find::existing::Error::NotFound { name: _ }) => return Ok(None),
            Err(e) => return Err(GitError::Gix(GixError::Head(e))),
        };
        let prefix = format!("{remote}/");
        Ok(reference.target().try_name().map(|target| {
            let short = target.shorten().to_string();
            short
                .strip_prefix(&prefix)
                .map_or_else(|| short.clone(), str::to_string)
        }))
    }

    fn read_status(root: &Path) -> GitResult<WorktreeStatus> {
        use gix::status::UntrackedFiles;

        let repo = Self::open(root)?;
        if repo.workdir().is_none() {
            return Err(GitError::Gix(GixError::BareRepository));
        }

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
            .next()
            .is_some();

        Ok(if has_changes {
            WorktreeStatus::Dirty
        } else {
            WorktreeStatus::Clean
        })
    }
}

#[async_trait]
impl RepoBackend for ShellBackend {
    async fn current_branch(&self, root: &Path) -> GitResult<Option<String>> {
        Self::offload(root, Self::read_current_branch).await
    }

    async fn remote_urls(&self, root: &Path, remote: &str) -> GitResult<Vec<String>> {
        let key = format!("remote.{remote}.url");
        Self::offload(root, move |root| Self::read_config_strings(root, &key)).await
    }

    async fn remote_head(&self, root: &Path, remote: &str) -> GitResult<Option<String>> {
        let remote = remote.to_string();
        Self::offload(root, move |root| Self::read_remote_head(root, &remote)).await
    }

    async fn refresh_remote_head(&self, root: &Path, remote: &str) -> GitResult<()> {
        Self::git(&["remote", "set-head", remote, "--auto"], root).await?;
        Ok(())
    }

    async fn status(&self, root: &Path) -> GitResult<WorktreeStatus> {
        Self::offload(root, Self::read_status).await
    }

    async fn fetch(&self, root: &Path, remote: &str) -> GitResult<SyncOutcome> {
        let output = Self::git(&["fetch", remote], root).await?;
        // git fetch prints nothing when no ref moved
        if output.stdout.is_empty() && output.stderr.is_empty() {
            return Err(GitError::AlreadyUpToDate {
                operation: format!("fetch {remote}"),
            });
        }
        Ok(SyncOutcome::Updated)
    }

    async fn branch_merge_target(&self, root: &Path, branch: &str) -> GitResult<Option<String>> {
        let key = format!("branch.{branch}.merge");
        let merge =
            Self::offload(root, move |root| Self::read_config_strings(root, &key)).await?;
        Ok(merge.first().map(|target| {
            target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string()
        }))
    }

    async fn checkout(&self, root: &Path, branch: &str) -> GitResult<()> {
        Self::git(&["checkout", "-q", branch], root).await?;
        Ok(())
    }

    async fn pull(&self, root: &Path) -> GitResult<SyncOutcome> {
        let output = Self::git(&["pull", "--ff-only"], root).await?;
        if output.stdout.contains("Already up to date")
            || output.stdout.contains("Already up-to-date")
        {
            return Err(GitError::AlreadyUpToDate {
                operation: "pull".to_string(),
            });
        }
        Ok(SyncOutcome::Updated)
    }

    async fn reset_hard(&self, root: &Path) -> GitResult<()> {
        Self::git(&["reset", "--hard", "-q", "HEAD"], root).await?;
        Ok(())
    }

    async fn show_diff(&self, root: &Path) -> GitResult<()> {
        Self::report(&["diff"], root).await?;
        Self::report(&["diff", "--cached"], root).await?;
        Self::report(&["status"], root).await
    }

    async fn delete_branch(&self, root: &Path, branch: &str) -> GitResult<()> {
        match Self::git(&["branch", "-D", branch], root).await {
            Err(GitError::CommandFailed { message, .. }) if message.contains("not found") => {
                Err(GitError::BranchNotFound {
                    branch: branch.to_string(),
                })
            }
            other => other.map(|_| ()),
        }
    }

    async fn create_branch(&self, root: &Path, branch: &str) -> GitResult<()> {
        Self::git(&["checkout", "-q", "-b", branch], root).await?;
        Ok(())
    }

    async fn commit_all(
        &self,
        root: &Path,
        message: &CommitMessage,
        identity: &CommitIdentity,
    ) -> GitResult<()> {
        Self::git(&["add", "-A"], root).await?;

        let args = [
            "commit",
            "-q",
            "-s",
            "-m",
            message.title.as_str(),
            "-m",
            message.body.as_str(),
        ];
        let mut cmd = Self::git_command(&args, root);
        cmd.env("GIT_AUTHOR_NAME", &identity.name)
            .env("GIT_AUTHOR_EMAIL", &identity.email)
            .env("GIT_COMMITTER_NAME", &identity.name)
            .env("GIT_COMMITTER_EMAIL", &identity.email);
        Self::run(&mut cmd, &args).await?;
        Ok(())
    }

    async fn push(&self, root: &Path, remote: &str, branch: &str, force: bool) -> GitResult<()> {
        let mut args = vec!["push", "-q", "-u", remote, branch];
        if force {
            args.push("-f");
        }
        Self::git(&args, root).await?;
        Ok(())
    }
}

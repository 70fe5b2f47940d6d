// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fan-out over repository paths.
//!
//! ```text
//! Coordinator::new(concurrency)
//!   .with_cancel_token()
//!   .run(paths, job).await
//!       normalize + dedupe paths (BTreeSet)
//!       one JoinSet task per path, Semaphore-bounded
//!       each task: select { job(path), token.cancelled() }
//!       join all --> MaintenanceFailures (path -> error)
//! ```
//!
//! Jobs never see each other's results. A failing, panicking or cancelled
//! job is recorded under its own path and every other job still runs to
//! completion.


use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span};

use crate::error::{MaintenanceFailures, RepomanError, RepomanResult, usage};
use crate::utility::fs::path::normalize;

/// Bounded, cancellable per-path runner.
pub struct Coordinator {
    concurrency: usize,
    cancel_token: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator running at most `concurrency` jobs at once
    /// (a limit of 0 is treated as 1).
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Shares an existing token, e.g. one cancelled on Ctrl-C.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Signals every running job to stop.
    pub fn interrupt_all(&self) {
        info!("interrupting all repositories");
        self.cancel_token.cancel();
    }

    /// Runs `job` once per unique path and waits for all of them.
    ///
    /// Paths are made absolute and lexically normalized first, so `d`, `d/`
    /// and `d/.` name one job. Jobs and failures use the normalized path.
    ///
    /// # Errors
    ///
    /// Returns [`RepomanError::Usage`] when `paths` is empty, and
    /// [`RepomanError::Failures`] naming every path whose job failed.
    pub async fn run<F, Fut>(&self, paths: &[String], job: F) -> RepomanResult<()>
    where
        F: Fn(String, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RepomanResult<()>> + Send + 'static,
    {
        let unique: BTreeSet<String> = paths.iter().map(|p| normalized_key(p)).collect();
        if unique.is_empty() {
            return Err(usage("at least one repository path is required"));
        }
        debug!(
            projects = ?unique,
            concurrency = self.concurrency,
            "starting fan-out"
        );

        let job = Arc::new(job);
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut task_paths = HashMap::new();

        for path in unique {
            let job = Arc::clone(&job);
            let semaphore = Arc::clone(&semaphore);
            let token = self.cancel_token.clone();
            let span = info_span!("repo", path = %path);
            let task_path = path.clone();

            let handle = tasks.spawn(
                async move {
                    let outcome = tokio::select! {
                        biased;
                        () = token.cancelled() => Err(RepomanError::Cancelled),
                        outcome = run_one(&semaphore, &*job, &task_path, &token) => outcome,
                    };
                    (task_path, outcome)
                }
                .instrument(span),
            );
            task_paths.insert(handle.id(), path);
        }

        let mut failures = MaintenanceFailures::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (path, Ok(())))) => info!(path = %path, "done"),
                Ok((_, (path, Err(err)))) => {
                    error!(path = %path, error = %err, "failed");
                    failures.insert(path, err);
                }
                Err(join_error) => {
                    let path = task_paths
                        .get(&join_error.id())
                        .cloned()
                        .unwrap_or_default();
                    error!(path = %path, error = %join_error, "task aborted");
                    let message = format!("task aborted: {join_error}");
                    failures.insert(path, RepomanError::Other(message.into_boxed_str()));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.into())
        }
    }
}

async fn run_one<F, Fut>(
    semaphore: &Semaphore,
    job: &F,
    path: &str,
    token: &CancellationToken,
) -> RepomanResult<()>
where
    F: Fn(String, CancellationToken) -> Fut,
    Fut: Future<Output = RepomanResult<()>>,
{
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|_| RepomanError::Cancelled)?;
    debug!("started");
    job(path.to_string(), token.clone()).await
}

/// Dedup key for a user-supplied path. Falls back to the raw string when it
/// cannot be made absolute (e.g. an empty path), leaving the error to the job.
fn normalized_key(raw: &str) -> String {
    normalize(Path::new(raw))
        .map_or_else(|_| raw.to_string(), |p| p.to_string_lossy().into_owned())
}

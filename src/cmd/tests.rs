// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::info::describe;
use super::{Pipeline, require_paths, run_pipeline};
use crate::config::Config;
use crate::error::RepomanError;
use crate::git::backend::{FakeBackend, FakeRepo};
use crate::project::ProjectOptions;
use crate::publish::{BotIdentity, ChangePublisher, PublishOutcome};
use crate::steps::{MutationStep, StepContext};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const BRANCH: &str = "dev/moul/maintenance";
const TITLE: &str = "chore: repo maintenance 🤖";

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Writes a file and flags the fake worktree as dirty.
struct TouchStep {
    backend: Arc<FakeBackend>,
}

#[async_trait]
impl MutationStep for TouchStep {
    fn name(&self) -> &str {
        "touch"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        std::fs::write(ctx.path().join("CHANGED"), "x")?;
        let mut repo = self.backend.repo(ctx.root()).context("unknown repository")?;
        repo.dirty = true;
        self.backend.insert(ctx.root(), repo);
        Ok(())
    }
}

struct BrokenStep;

#[async_trait]
impl MutationStep for BrokenStep {
    fn name(&self) -> &str {
        "broken"
    }

    async fn apply(&self, _ctx: &StepContext) -> anyhow::Result<()> {
        anyhow::bail!("no luck")
    }
}

/// Compatible checkout at `<temp>/<name>` registered in the fake backend.
fn checkout(temp: &TempDir, backend: &FakeBackend, name: &str) -> PathBuf {
    let root = temp.path().join(name);
    std::fs::create_dir_all(root.join(".git")).unwrap();
    std::fs::write(root.join("Makefile"), "all:\n").unwrap();
    backend.insert(
        &root,
        FakeRepo::new(&format!("git@github.com:moul/{name}.git")),
    );
    root
}

fn pipeline(backend: &Arc<FakeBackend>, steps: Vec<Box<dyn MutationStep>>) -> Pipeline {
    let publisher = ChangePublisher::new(backend.clone())
        .with_identity(BotIdentity::new("moul-bot", "bot@moul.io"));
    let options = ProjectOptions {
        show_diff: false,
        ..ProjectOptions::default()
    };
    Pipeline::new(backend.clone(), vec!["Makefile".to_string()], publisher, options)
        .with_steps(steps)
        .with_change(BRANCH, TITLE)
}

// =============================================================================
// Pipeline
// =============================================================================

#[tokio::test]
async fn test_pipeline_commits_and_pushes_changes() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let root = checkout(&temp, &backend, "demo");
    let steps: Vec<Box<dyn MutationStep>> = vec![Box::new(TouchStep {
        backend: backend.clone(),
    })];

    let outcome = pipeline(&backend, steps)
        .run(root.to_str().unwrap(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PublishOutcome::Pushed {
            branch: BRANCH.to_string()
        }
    );
    assert!(root.join("CHANGED").exists());
    let repo = backend.repo(&root).unwrap();
    assert_eq!(repo.commits.len(), 1);
    assert_eq!(repo.commits[0].branch.as_deref(), Some(BRANCH));
    assert_eq!(repo.commits[0].title, TITLE);
    assert_eq!(repo.pushes.len(), 1);
    assert!(repo.pushes[0].force);
}

#[tokio::test]
async fn test_pipeline_without_changes_publishes_nothing() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let root = checkout(&temp, &backend, "demo");

    let outcome = pipeline(&backend, Vec::new())
        .run(root.to_str().unwrap(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, PublishOutcome::NoChanges);
    assert!(backend.repo(&root).unwrap().pushes.is_empty());
}

#[tokio::test]
async fn test_pipeline_step_failure_stops_before_publish() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let root = checkout(&temp, &backend, "demo");
    let steps: Vec<Box<dyn MutationStep>> = vec![
        Box::new(BrokenStep),
        Box::new(TouchStep {
            backend: backend.clone(),
        }),
    ];

    let err = pipeline(&backend, steps)
        .run(root.to_str().unwrap(), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RepomanError::Mutation(_)));
    insta::assert_snapshot!(err.to_string(), @"broken: no luck");
    assert!(!root.join("CHANGED").exists());
    let repo = backend.repo(&root).unwrap();
    assert!(repo.commits.is_empty());
    assert!(repo.pushes.is_empty());
}

#[tokio::test]
async fn test_pipeline_local_mode_skips_commit() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let root = checkout(&temp, &backend, "demo");
    let steps: Vec<Box<dyn MutationStep>> = vec![Box::new(TouchStep {
        backend: backend.clone(),
    })];
    let publisher = ChangePublisher::new(backend.clone());
    let options = ProjectOptions {
        open_pr: false,
        show_diff: false,
        ..ProjectOptions::default()
    };

    let outcome = Pipeline::new(backend.clone(), Vec::new(), publisher, options)
        .with_steps(steps)
        .with_change(BRANCH, TITLE)
        .run(root.to_str().unwrap(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Local);
    assert!(root.join("CHANGED").exists());
    assert!(backend.repo(&root).unwrap().commits.is_empty());
}

#[tokio::test]
async fn test_pipeline_incompatible_project_is_untouched() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let root = checkout(&temp, &backend, "demo");
    std::fs::remove_file(root.join("Makefile")).unwrap();
    let steps: Vec<Box<dyn MutationStep>> = vec![Box::new(TouchStep {
        backend: backend.clone(),
    })];

    let err = pipeline(&backend, steps)
        .run(root.to_str().unwrap(), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RepomanError::Prepare(_)));
    assert!(!root.join("CHANGED").exists());
}

#[tokio::test]
async fn test_pipeline_cancelled_before_publish() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let root = checkout(&temp, &backend, "demo");
    let token = CancellationToken::new();
    token.cancel();

    let err = pipeline(&backend, Vec::new())
        .run(root.to_str().unwrap(), token)
        .await
        .unwrap_err();

    assert!(matches!(err, RepomanError::Cancelled));
    assert!(backend.repo(&root).unwrap().pushes.is_empty());
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn test_run_pipeline_isolates_failures() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let good = checkout(&temp, &backend, "good");
    let missing = temp.path().join("missing");
    let steps: Vec<Box<dyn MutationStep>> = vec![Box::new(TouchStep {
        backend: backend.clone(),
    })];
    let paths = vec![
        good.display().to_string(),
        missing.display().to_string(),
        good.display().to_string(),
    ];

    let err = run_pipeline(
        pipeline(&backend, steps),
        &paths,
        &Config::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    let RepomanError::Failures(failures) = err else {
        panic!("expected aggregate failures, got {err}");
    };
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures.get(&missing.display().to_string()),
        Some(RepomanError::Discovery(_))
    ));
    let repo = backend.repo(&good).unwrap();
    assert_eq!(repo.commits.len(), 1);
    assert_eq!(repo.pushes.len(), 1);
}

#[test]
fn test_require_paths() {
    assert!(require_paths(&["a".to_string()]).is_ok());
    let err = require_paths(&[]).unwrap_err();
    assert!(err.is_usage());
    insta::assert_snapshot!(err.to_string(), @"usage error: at least one repository path is required");
}

// =============================================================================
// info
// =============================================================================

#[tokio::test]
async fn test_describe_renders_project_json() {
    let temp = temp_dir();
    let backend = FakeBackend::new();
    let root = checkout(&temp, &backend, "demo");
    std::fs::write(root.join("go.mod"), "module moul.io/demo\n").unwrap();

    let json = describe(root.to_str().unwrap(), &backend).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["git"]["repo_owner"], "moul");
    assert_eq!(value["git"]["repo_name"], "demo");
    assert_eq!(value["git"]["main_branch"], "main");
    assert_eq!(value["git"]["in_main_branch"], true);
    assert_eq!(value["git"]["metadata"]["has_go"], true);
    assert_eq!(value["git"]["metadata"]["go_mod_path"], "moul.io/demo");
}

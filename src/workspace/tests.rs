// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::WorkspacePreparer;
use crate::error::PrepareError;
use crate::git::backend::{FakeBackend, FakeRepo, FakeSync};
use crate::git::discover;
use crate::project::{Project, ProjectOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn markers() -> Vec<String> {
    vec!["Makefile".to_string(), "rules.mk".to_string()]
}

/// Checkout with `.git` and both marker files.
fn compatible_checkout(temp: &TempDir) -> PathBuf {
    let root = temp.path().join("repo");
    std::fs::create_dir_all(root.join(".git")).unwrap();
    std::fs::write(root.join("Makefile"), "include rules.mk\n").unwrap();
    std::fs::write(root.join("rules.mk"), "").unwrap();
    root
}

async fn setup(temp: &TempDir, repo: FakeRepo) -> (Arc<FakeBackend>, Project) {
    let root = compatible_checkout(temp);
    let backend = Arc::new(FakeBackend::new().with_repo(&root, repo));
    let project = discover(&root, backend.as_ref()).await.unwrap();
    (backend, project)
}

fn fake_repo() -> FakeRepo {
    FakeRepo::new("git@github.com:moul/repoman.git")
}

fn calls_after_discovery(backend: &FakeBackend) -> Vec<String> {
    // discovery ends with the status snapshot
    let calls = backend.calls();
    let start = calls
        .iter()
        .position(|call| call == "status")
        .map_or(0, |i| i + 1);
    calls[start..].to_vec()
}

#[tokio::test]
async fn test_dirty_without_reset_fails_before_fetch() {
    let temp = temp_dir();
    let (backend, mut project) = setup(&temp, fake_repo().dirty(true)).await;
    let preparer = WorkspacePreparer::new(backend.clone(), markers());

    let err = preparer
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PrepareError::DirtyWorktree { .. }));
    assert!(calls_after_discovery(&backend).is_empty());
}

#[tokio::test]
async fn test_dirty_with_reset_proceeds_when_clean() {
    let temp = temp_dir();
    let (backend, mut project) = setup(&temp, fake_repo().dirty(true)).await;
    let preparer = WorkspacePreparer::new(backend.clone(), markers());
    let options = ProjectOptions {
        reset: true,
        ..ProjectOptions::default()
    };

    preparer.prepare(&mut project, &options).await.unwrap();

    assert_eq!(
        calls_after_discovery(&backend),
        vec!["reset_hard", "status", "fetch origin"]
    );
    assert!(!project.git.unwrap().is_dirty);
}

#[tokio::test]
async fn test_reset_that_leaves_dirt_still_fails() {
    let temp = temp_dir();
    let mut repo = fake_repo().dirty(true);
    repo.dirty_after_reset = true;
    let (backend, mut project) = setup(&temp, repo).await;
    let preparer = WorkspacePreparer::new(backend.clone(), markers());
    let options = ProjectOptions {
        reset: true,
        ..ProjectOptions::default()
    };

    let err = preparer.prepare(&mut project, &options).await.unwrap_err();
    assert!(matches!(err, PrepareError::DirtyWorktree { .. }));
    assert_eq!(calls_after_discovery(&backend), vec!["reset_hard", "status"]);
}

#[tokio::test]
async fn test_fetch_up_to_date_is_success() {
    let temp = temp_dir();
    let mut repo = fake_repo();
    repo.fetch = FakeSync::UpToDate;
    let (backend, mut project) = setup(&temp, repo).await;
    let preparer = WorkspacePreparer::new(backend, markers());

    preparer
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fetch_failure_is_fatal() {
    let temp = temp_dir();
    let mut repo = fake_repo();
    repo.fetch = FakeSync::Fail("could not resolve host".to_string());
    let (backend, mut project) = setup(&temp, repo).await;
    let preparer = WorkspacePreparer::new(backend, markers());

    let err = preparer
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PrepareError::FetchFailed(_)));
}

#[tokio::test]
async fn test_switches_to_main_and_pulls() {
    let temp = temp_dir();
    let mut repo = fake_repo().on_branch("feature");
    repo.pull = FakeSync::UpToDate;
    let (backend, mut project) = setup(&temp, repo).await;
    let preparer = WorkspacePreparer::new(backend.clone(), markers());
    let options = ProjectOptions {
        fetch: false,
        ..ProjectOptions::default()
    };

    preparer.prepare(&mut project, &options).await.unwrap();

    let git = project.git.unwrap();
    assert_eq!(git.current_branch.as_deref(), Some("main"));
    assert!(git.in_main_branch);
    assert_eq!(
        calls_after_discovery(&backend),
        vec![
            "branch_merge_target main",
            "checkout main",
            "pull",
            "current_branch",
            "status"
        ]
    );
}

#[tokio::test]
async fn test_checkout_uses_merge_target() {
    let temp = temp_dir();
    let mut repo = fake_repo().on_branch("feature");
    repo.merge_targets
        .insert("main".to_string(), "trunk".to_string());
    let (backend, mut project) = setup(&temp, repo).await;
    let preparer = WorkspacePreparer::new(backend.clone(), markers());

    preparer
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap();
    assert!(backend.calls().contains(&"checkout trunk".to_string()));
}

#[tokio::test]
async fn test_checkout_and_pull_failures_are_fatal() {
    let temp = temp_dir();
    let mut repo = fake_repo().on_branch("feature");
    repo.fail_checkout = true;
    let (backend, mut project) = setup(&temp, repo).await;
    let err = WorkspacePreparer::new(backend, markers())
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PrepareError::CheckoutFailed { .. }));

    let temp = temp_dir();
    let mut repo = fake_repo().on_branch("feature");
    repo.pull = FakeSync::Fail("not possible to fast-forward".to_string());
    let (backend, mut project) = setup(&temp, repo).await;
    let err = WorkspacePreparer::new(backend, markers())
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PrepareError::CheckoutFailed { .. }));
}

#[tokio::test]
async fn test_no_checkout_when_already_on_main() {
    let temp = temp_dir();
    let (backend, mut project) = setup(&temp, fake_repo()).await;
    WorkspacePreparer::new(backend.clone(), markers())
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap();
    assert_eq!(calls_after_discovery(&backend), vec!["fetch origin"]);
}

#[tokio::test]
async fn test_missing_markers_are_all_reported() {
    let temp = temp_dir();
    let (backend, mut project) = setup(&temp, fake_repo()).await;
    std::fs::remove_file(project.path.join("Makefile")).unwrap();
    std::fs::remove_file(project.path.join("rules.mk")).unwrap();

    let err = WorkspacePreparer::new(backend, markers())
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap_err();

    match err {
        PrepareError::IncompatibleProject { missing } => {
            assert_eq!(missing, vec!["Makefile", "rules.mk"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_git_project_rejected() {
    let temp = temp_dir();
    let backend = Arc::new(FakeBackend::new());
    let mut project = Project {
        path: temp.path().to_path_buf(),
        git: None,
    };
    let err = WorkspacePreparer::new(backend, markers())
        .prepare(&mut project, &ProjectOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PrepareError::NoGitRoot { .. }));
}

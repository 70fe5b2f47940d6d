// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::path::normalize;
use super::walk::{WalkOptions, find_files, parallel_walk};
use std::path::Path;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn relative(root: &Path, files: &[std::path::PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .expect("under root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}

#[test]
fn test_parallel_walk_default_hides_dotfiles() {
    let temp = temp_dir();
    write(temp.path(), "file1.txt", "");
    write(temp.path(), "subdir/file2.txt", "");
    write(temp.path(), ".hidden", "");

    let result = parallel_walk(temp.path(), &WalkOptions::default()).expect("walk");

    assert_eq!(
        relative(temp.path(), result.files()),
        vec!["file1.txt", "subdir/file2.txt"]
    );
    assert_eq!(result.error_count(), 0);
}

#[test]
fn test_parallel_walk_worktree_includes_hidden_skips_git() {
    let temp = temp_dir();
    write(temp.path(), ".git/config", "");
    write(temp.path(), ".github/workflows/ci.yml", "");
    write(temp.path(), ".gitignore", "ignored.txt\n");
    write(temp.path(), "ignored.txt", "");
    write(temp.path(), "main.go", "");

    let result = parallel_walk(temp.path(), &WalkOptions::for_worktree()).expect("walk");

    insta::assert_debug_snapshot!(relative(temp.path(), result.files()), @r#"
    [
        ".github/workflows/ci.yml",
        ".gitignore",
        "ignored.txt",
        "main.go",
    ]
    "#);
}

#[test]
fn test_parallel_walk_missing_root() {
    let temp = temp_dir();
    let err = parallel_walk(temp.path().join("missing"), &WalkOptions::default())
        .expect_err("missing root should fail");
    assert!(err.to_string().starts_with("root directory does not exist"));
}

#[test]
fn test_find_files() {
    let temp = temp_dir();
    write(temp.path(), "file1.rs", "");
    write(temp.path(), "file2.txt", "");
    write(temp.path(), "subdir/file3.rs", "");

    let rust_files = find_files(temp.path(), "**/*.rs", &WalkOptions::default()).expect("find");

    assert_eq!(
        relative(temp.path(), &rust_files),
        vec!["file1.rs", "subdir/file3.rs"]
    );
}

#[test]
fn test_find_files_top_level_pattern() {
    let temp = temp_dir();
    write(temp.path(), "main.go", "");
    write(temp.path(), "main_test.go", "");
    write(temp.path(), "cmd/main.go", "");
    write(temp.path(), "lib.go", "");

    let found = find_files(temp.path(), "main*.go", &WalkOptions::for_worktree()).expect("find");

    assert_eq!(
        relative(temp.path(), &found),
        vec!["main.go", "main_test.go"]
    );
}

#[test]
fn test_find_files_invalid_pattern() {
    let temp = temp_dir();
    let err = find_files(temp.path(), "{a,b", &WalkOptions::default())
        .expect_err("invalid glob");
    assert!(err.to_string().starts_with("invalid glob pattern"));
}

#[test]
fn test_normalize_folds_dot_components() {
    let cases = [
        ("/srv/repos", "/srv/repos"),
        ("/srv/repos/", "/srv/repos"),
        ("/srv/repos/.", "/srv/repos"),
        ("/srv/repos/./demo/..", "/srv/repos"),
        ("/srv/repos/demo/../other", "/srv/repos/other"),
    ];
    for (input, expected) in cases {
        assert_eq!(
            normalize(Path::new(input)).expect("normalize"),
            Path::new(expected),
            "{input}"
        );
    }
}

#[test]
fn test_normalize_relative_is_anchored_at_cwd() {
    let cwd = std::env::current_dir().expect("cwd");
    assert_eq!(normalize(Path::new("./demo/")).expect("normalize"), cwd.join("demo"));
    assert_eq!(normalize(Path::new("demo/..")).expect("normalize"), cwd);
}

#[test]
fn test_normalize_empty_path_errors() {
    assert!(normalize(Path::new("")).is_err());
}

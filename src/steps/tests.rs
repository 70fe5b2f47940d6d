// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::{
    AuthorsStep, CommandStep, CopyrightYearStep, LintVersionStep, MutationStep,
    RemoveGoBinaryStep, RulesMkStep, StepContext, TemplateFilesStep, TemplateSubstitutionStep,
    maintenance_steps, patch_copyright, patch_lint_version, run_steps, strip_makefile,
    template_steps,
};
use crate::config::Config;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn ctx(dir: &Path) -> StepContext {
    StepContext::new(
        dir.to_path_buf(),
        dir.to_path_buf(),
        "acme".to_string(),
        "demo".to_string(),
        CancellationToken::new(),
    )
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}

fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).expect("read file")
}

struct RecordingStep {
    name: &'static str,
    fail: bool,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl MutationStep for RecordingStep {
    fn name(&self) -> &str {
        self.name
    }

    async fn apply(&self, _ctx: &StepContext) -> anyhow::Result<()> {
        self.log.lock().expect("lock").push(self.name.to_string());
        if self.fail {
            anyhow::bail!("broken");
        }
        Ok(())
    }
}

fn recording(
    log: &Arc<Mutex<Vec<String>>>,
    specs: &[(&'static str, bool)],
) -> Vec<Box<dyn MutationStep>> {
    specs
        .iter()
        .map(|&(name, fail)| {
            Box::new(RecordingStep {
                name,
                fail,
                log: Arc::clone(log),
            }) as Box<dyn MutationStep>
        })
        .collect()
}

// =============================================================================
// run_steps
// =============================================================================

#[tokio::test]
async fn test_run_steps_in_order() {
    let temp = temp_dir();
    let log = Arc::new(Mutex::new(Vec::new()));
    let steps = recording(&log, &[("first", false), ("second", false)]);

    run_steps(&steps, &ctx(temp.path())).await.expect("all steps pass");

    assert_eq!(*log.lock().expect("lock"), vec!["first", "second"]);
}

#[tokio::test]
async fn test_run_steps_stops_at_first_failure() {
    let temp = temp_dir();
    let log = Arc::new(Mutex::new(Vec::new()));
    let steps = recording(&log, &[("first", false), ("second", true), ("third", false)]);

    let err = run_steps(&steps, &ctx(temp.path()))
        .await
        .expect_err("second step fails");

    assert_eq!(err.step, "second");
    insta::assert_snapshot!(err.to_string(), @"second: broken");
    assert_eq!(*log.lock().expect("lock"), vec!["first", "second"]);
}

#[tokio::test]
async fn test_run_steps_cancelled_before_start() {
    let temp = temp_dir();
    let log = Arc::new(Mutex::new(Vec::new()));
    let steps = recording(&log, &[("first", false)]);
    let ctx = ctx(temp.path());
    ctx.cancel_token().cancel();

    let err = run_steps(&steps, &ctx).await.expect_err("cancelled");

    insta::assert_snapshot!(err.to_string(), @"first: cancelled");
    assert!(log.lock().expect("lock").is_empty());
}

#[test]
fn test_maintenance_step_selection() {
    let config = Config::default();
    let names = |steps: Vec<Box<dyn MutationStep>>| {
        steps
            .iter()
            .map(|s| s.name().to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(
        names(maintenance_steps(&config, true, true)),
        vec![
            "bump-deps",
            "template-files",
            "rules-mk",
            "authors",
            "copyright-year",
            "lint-version",
        ]
    );
    assert_eq!(names(maintenance_steps(&config, true, false)), vec!["bump-deps"]);
    assert!(maintenance_steps(&config, false, false).is_empty());
    assert_eq!(
        names(template_steps("golang-repo-template", "moul", true)),
        vec!["remove-go-binary", "template-substitution"]
    );
    assert_eq!(
        names(template_steps("golang-repo-template", "moul", false)),
        vec!["template-substitution"]
    );
}

// =============================================================================
// CommandStep
// =============================================================================

#[tokio::test]
async fn test_command_step_runs_in_project_dir() {
    let temp = temp_dir();
    let step = CommandStep::shell("touch", "touch made-by-step");

    step.apply(&ctx(temp.path())).await.expect("command succeeds");

    assert!(temp.path().join("made-by-step").is_file());
}

#[tokio::test]
async fn test_command_step_failure_is_reported() {
    let temp = temp_dir();
    let steps: Vec<Box<dyn MutationStep>> = vec![Box::new(CommandStep::shell("boom", "exit 7"))];

    let err = run_steps(&steps, &ctx(temp.path()))
        .await
        .expect_err("non-zero exit");

    insta::assert_snapshot!(err.to_string(), @r#"boom: process '/bin/sh -xec "exit 7"' exited with code 7"#);
}

#[tokio::test]
async fn test_command_step_from_argv() {
    let argv = vec!["go".to_string(), "get".to_string(), "-u".to_string(), "./...".to_string()];
    let step = CommandStep::from_argv("bump-deps", &argv);
    assert_eq!(step.program(), "go");
    assert_eq!(step.args(), ["get", "-u", "./..."]);

    let temp = temp_dir();
    let err = CommandStep::from_argv("bump-deps", &[])
        .apply(&ctx(temp.path()))
        .await
        .expect_err("empty argv");
    assert_eq!(err.to_string(), "no command configured");
}

#[tokio::test]
async fn test_command_step_cancelled() {
    let temp = temp_dir();
    let ctx = ctx(temp.path());
    ctx.cancel_token().cancel();

    let err = CommandStep::new("sleep", "sleep", ["30"])
        .apply(&ctx)
        .await
        .expect_err("cancelled");

    insta::assert_snapshot!(err.to_string(), @"process 'sleep 30' was interrupted");
}

// =============================================================================
// rules.mk and AUTHORS
// =============================================================================

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

#[tokio::test]
async fn test_rules_mk_refreshed_from_upstream() {
    let temp = temp_dir();
    let project = temp.path().join("project");
    write(&project, "rules.mk", "# old\n");
    write(temp.path(), "upstream/rules.mk", "# new\n");

    RulesMkStep::new(temp.path().join("upstream/rules.mk"))
        .apply(&ctx(&project))
        .await
        .expect("refresh succeeds");

    assert_eq!(read(&project, "rules.mk"), "# new\n");
}

#[tokio::test]
async fn test_rules_mk_not_added_to_projects_without_one() {
    let temp = temp_dir();
    let project = temp.path().join("project");
    write(&project, "Makefile", "all:\n");
    write(temp.path(), "upstream/rules.mk", "# new\n");

    RulesMkStep::new(temp.path().join("upstream/rules.mk"))
        .apply(&ctx(&project))
        .await
        .expect("skip succeeds");

    assert!(!project.join("rules.mk").exists());
}

#[tokio::test]
async fn test_rules_mk_missing_upstream_keeps_project_copy() {
    let temp = temp_dir();
    write(temp.path(), "rules.mk", "# old\n");

    RulesMkStep::new(temp.path().join("absent/rules.mk"))
        .apply(&ctx(temp.path()))
        .await
        .expect("skip succeeds");

    assert_eq!(read(temp.path(), "rules.mk"), "# old\n");
}

#[tokio::test]
async fn test_authors_generated_when_rules_mk_present() {
    let temp = temp_dir();
    write(temp.path(), "rules.mk", "");

    AuthorsStep::from_argv(&sh("echo 'Jane <jane@example.com>' > AUTHORS"))
        .apply(&ctx(temp.path()))
        .await
        .expect("generation succeeds");

    assert_eq!(read(temp.path(), "AUTHORS"), "Jane <jane@example.com>\n");
}

#[tokio::test]
async fn test_authors_skipped_without_rules_mk() {
    let temp = temp_dir();

    AuthorsStep::from_argv(&sh("touch AUTHORS"))
        .apply(&ctx(temp.path()))
        .await
        .expect("skip succeeds");

    assert!(!temp.path().join("AUTHORS").exists());
}

#[tokio::test]
async fn test_authors_failure_is_tolerated() {
    let temp = temp_dir();
    write(temp.path(), "rules.mk", "");

    AuthorsStep::from_argv(&sh("exit 2"))
        .apply(&ctx(temp.path()))
        .await
        .expect("failure is only logged");
}

#[tokio::test]
async fn test_authors_cancellation_fails_the_step() {
    let temp = temp_dir();
    write(temp.path(), "rules.mk", "");
    let ctx = ctx(temp.path());
    ctx.cancel_token().cancel();

    let err = AuthorsStep::from_argv(&sh("sleep 30"))
        .apply(&ctx)
        .await
        .expect_err("cancelled");

    insta::assert_snapshot!(err.to_string(), @r#"process 'sh -c "sleep 30"' was interrupted"#);
}

// =============================================================================
// Copyright
// =============================================================================

#[test]
fn test_patch_copyright() {
    let input = concat!(
        "Copyright © 2019 Manfred Touron\n",
        "Copyright 2014-2020 Foo\n",
        "Copyright (c) 2018 Bar\n",
        "Copyright (c) 2026-2026 Baz\n",
        "Copyright 2026 Qux\n",
        "© 2026-2026.\n",
        "Copyright 2030 Future\n",
    );

    let output = patch_copyright(input, 2026).expect("patch");

    insta::assert_snapshot!(output.trim_end(), @r"
    Copyright © 2019-2026 Manfred Touron
    Copyright 2014-2026 Foo
    Copyright (c) 2018-2026 Bar
    Copyright (c) 2026 Baz
    Copyright 2026 Qux
    © 2026.
    Copyright 2030 Future
    ");
    assert_eq!(patch_copyright(&output, 2026).expect("patch"), output);
}

#[tokio::test]
async fn test_copyright_step_patches_known_files_only() {
    let temp = temp_dir();
    write(temp.path(), "LICENSE", "Copyright (c) 2018 Acme\n");
    write(temp.path(), "README.md", "© 2020-2024 Acme\n");
    write(temp.path(), "NOTICE", "Copyright 2018 Acme\n");

    CopyrightYearStep::new(2026)
        .apply(&ctx(temp.path()))
        .await
        .expect("patch");

    assert_eq!(read(temp.path(), "LICENSE"), "Copyright (c) 2018-2026 Acme\n");
    assert_eq!(read(temp.path(), "README.md"), "© 2020-2026 Acme\n");
    assert_eq!(read(temp.path(), "NOTICE"), "Copyright 2018 Acme\n");
}

// =============================================================================
// Lint version
// =============================================================================

#[test]
fn test_patch_lint_version() {
    let input = concat!(
        "      - uses: golangci/golangci-lint-action@v2\n",
        "        with:\n",
        "          version: v1.26\n",
        "          version: v1.40\n",
        "          version: v1.38\n",
    );

    assert_eq!(
        patch_lint_version(input, "v1.38").expect("patch"),
        input.replacen("version: v1.26", "version: v1.38", 1)
    );
    assert!(patch_lint_version(input, "1.38").is_err());
}

#[tokio::test]
async fn test_lint_version_step_patches_workflows() {
    let temp = temp_dir();
    write(temp.path(), ".github/workflows/go.yml", "version: v1.27\n");
    write(temp.path(), ".github/workflows/notes.txt", "version: v1.27\n");

    LintVersionStep::new("v1.38")
        .apply(&ctx(temp.path()))
        .await
        .expect("patch");

    assert_eq!(read(temp.path(), ".github/workflows/go.yml"), "version: v1.38\n");
    assert_eq!(read(temp.path(), ".github/workflows/notes.txt"), "version: v1.27\n");
}

#[tokio::test]
async fn test_lint_version_step_without_workflows() {
    let temp = temp_dir();
    LintVersionStep::new("v1.38")
        .apply(&ctx(temp.path()))
        .await
        .expect("nothing to patch");
}

// =============================================================================
// Template files
// =============================================================================

#[tokio::test]
async fn test_template_files_copied_and_legacy_moved() {
    let template = temp_dir();
    write(template.path(), ".github/renovate.json", "{\"extends\":[\"config:base\"]}\n");
    write(template.path(), ".github/dependabot.yml", "version: 2\n");
    let project = temp_dir();
    write(project.path(), "renovate.json", "{}\n");

    TemplateFilesStep::new(template.path())
        .apply(&ctx(project.path()))
        .await
        .expect("copy");

    assert!(!project.path().join("renovate.json").exists());
    assert_eq!(
        read(project.path(), ".github/renovate.json"),
        "{\"extends\":[\"config:base\"]}\n"
    );
    assert_eq!(read(project.path(), ".github/dependabot.yml"), "version: 2\n");
}

#[tokio::test]
async fn test_template_files_missing_template_dir() {
    let project = temp_dir();
    write(project.path(), "renovate.json", "{}\n");

    TemplateFilesStep::new(project.path().join("no-such-template"))
        .apply(&ctx(project.path()))
        .await
        .expect("missing template is not an error");

    assert_eq!(read(project.path(), ".github/renovate.json"), "{}\n");
    assert!(!project.path().join(".github/dependabot.yml").exists());
}

// =============================================================================
// Template substitution
// =============================================================================

#[test]
fn test_substitute_name_before_owner() {
    let step = TemplateSubstitutionStep::new("golang-repo-template", "moul");

    assert_eq!(
        step.substitute("moul.io/golang-repo-template by moul", "demo", "acme")
            .as_deref(),
        Some("acme.io/demo by acme")
    );
    assert_eq!(step.substitute("nothing here", "demo", "acme"), None);

    let empty = TemplateSubstitutionStep::new("", "");
    assert_eq!(empty.substitute("abc", "demo", "acme"), None);
}

#[tokio::test]
async fn test_template_substitution_step() {
    let temp = temp_dir();
    write(temp.path(), "README.md", "# golang-repo-template\nby moul\n");
    write(temp.path(), ".github/workflows/ci.yml", "image: moul/golang-repo-template\n");
    write(temp.path(), ".git/config", "url = golang-repo-template\n");
    std::fs::write(temp.path().join("logo.bin"), b"golang-repo-template\0moul")
        .expect("write binary");

    TemplateSubstitutionStep::new("golang-repo-template", "moul")
        .apply(&ctx(temp.path()))
        .await
        .expect("substitute");

    assert_eq!(read(temp.path(), "README.md"), "# demo\nby acme\n");
    assert_eq!(read(temp.path(), ".github/workflows/ci.yml"), "image: acme/demo\n");
    assert_eq!(read(temp.path(), ".git/config"), "url = golang-repo-template\n");
    assert_eq!(
        std::fs::read(temp.path().join("logo.bin")).expect("read binary"),
        b"golang-repo-template\0moul"
    );
}

// =============================================================================
// Remove Go binary
// =============================================================================

const TEMPLATE_MAKEFILE: &str = concat!(
    "GOPKG ?= moul.io/demo\n",
    "DOCKER_IMAGE ?= moul/demo\n",
    "GOBINS ?= .\n",
    "NPM_PACKAGES ?= .\n",
    "\n",
    "include rules.mk\n",
    "\n",
    "generate: install\n",
    "\tGO111MODULE=off go get github.com/campoy/embedmd\n",
    "\tembedmd -w README.md\n",
    ".PHONY: generate\n",
    "\n",
    "lint:\n",
    "\tgolangci-lint run\n",
);

#[test]
fn test_strip_makefile() {
    let stripped = strip_makefile(TEMPLATE_MAKEFILE).expect("strip");
    assert_eq!(
        stripped,
        "GOPKG ?= moul.io/demo\n\ninclude rules.mk\n\nlint:\n\tgolangci-lint run\n"
    );
}

#[tokio::test]
async fn test_remove_go_binary_step() {
    let temp = temp_dir();
    write(temp.path(), "main.go", "package main\n");
    write(temp.path(), "main_test.go", "package main\n");
    write(temp.path(), "lib.go", "package demo\n");
    write(temp.path(), "Makefile", TEMPLATE_MAKEFILE);
    write(temp.path(), "Dockerfile", "FROM scratch\n");
    write(temp.path(), ".github/workflows/docker.yml", "on: push\n");

    RemoveGoBinaryStep::new()
        .with_script("touch regenerated")
        .apply(&ctx(temp.path()))
        .await
        .expect("remove binary");

    assert!(!temp.path().join("main.go").exists());
    assert!(!temp.path().join("main_test.go").exists());
    assert!(temp.path().join("lib.go").exists());
    assert!(!temp.path().join("Dockerfile").exists());
    assert!(!temp.path().join(".github/workflows/docker.yml").exists());
    assert!(temp.path().join("regenerated").exists());
    assert!(!read(temp.path(), "Makefile").contains("DOCKER_IMAGE"));
}

#[tokio::test]
async fn test_remove_go_binary_requires_makefile() {
    let temp = temp_dir();
    write(temp.path(), "main.go", "package main\n");

    let err = RemoveGoBinaryStep::new()
        .with_script("true")
        .apply(&ctx(temp.path()))
        .await
        .expect_err("missing Makefile");

    assert!(err.to_string().starts_with("failed to read"));
}

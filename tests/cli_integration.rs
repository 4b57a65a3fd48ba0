//! Integration tests for the `syntaq` binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn syntaq_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_syntaq"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Run the binary inside `dir` so no stray syntaq.json is picked up.
fn run(dir: &tempfile::TempDir, args: &[&str]) -> Output {
    Command::new(syntaq_bin())
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .args(args)
        .output()
        .expect("failed to run syntaq")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn render_html_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["render", fixture("reference.syntaq").to_str().unwrap()]);

    assert!(output.status.success());
    let html = stdout(&output);
    assert!(html.starts_with("<h1>Syntaq Reference</h1>"));
    assert!(!html.contains("<!DOCTYPE html>"));
}

#[test]
fn render_page_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let source = fixture("reference.syntaq");

    let page = run(&dir, &["render", source.to_str().unwrap(), "--format", "page"]);
    assert!(page.status.success());
    assert!(stdout(&page).contains("<title>Syntaq Reference</title>"));

    let json = run(&dir, &["render", source.to_str().unwrap(), "--format", "json"]);
    assert!(json.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&json)).unwrap();
    assert_eq!(value["blocks"][0]["kind"], "heading");
}

#[test]
fn render_reports_diagnostics_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["render", fixture("broken.syntaq").to_str().unwrap()]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[W001]"), "stderr: {stderr}");
    assert!(stderr.contains("[W004]"), "stderr: {stderr}");
    assert!(!stdout(&output).contains("[W001]"));
}

#[test]
fn check_clean_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["check", fixture("reference.syntaq").to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("OK"));
}

#[test]
fn check_warnings_fail_only_when_strict() {
    let dir = tempfile::tempdir().unwrap();
    let broken = fixture("broken.syntaq");

    let lenient = run(&dir, &["check", broken.to_str().unwrap()]);
    assert!(lenient.status.success());
    let out = stdout(&lenient);
    assert!(out.contains("broken.syntaq:3: warning: [W004]"), "stdout: {out}");
    assert!(out.contains("[V005]"));

    let strict = run(&dir, &["check", "--strict", broken.to_str().unwrap()]);
    assert!(!strict.status.success());
}

#[test]
fn check_nesting_error_fails() {
    let dir = tempfile::tempdir().unwrap();
    let deep = dir.path().join("deep.syntaq");
    fs::write(&deep, format!("{} too deep", "#".repeat(80))).unwrap();

    let output = run(&dir, &["check", deep.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("limit is 64"));
}

#[test]
fn config_file_changes_depth_limit() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("syntaq.json"), r#"{ "parse": { "maxDepth": 2 } }"#).unwrap();
    let list = dir.path().join("list.syntaq");
    fs::write(&list, "* a\n** b\n*** c").unwrap();

    let output = run(&dir, &["check", list.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("limit is 2"));
}

#[test]
fn build_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let status = run(
        &dir,
        &[
            "build",
            fixture("reference.syntaq").to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--title",
            "Custom Title",
            "--quiet",
        ],
    )
    .status;

    assert!(status.success(), "syntaq build should succeed");
    let html = fs::read_to_string(out.join("reference.html")).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("<title>Custom Title</title>"));
    assert!(html.contains("<h1>Syntaq Reference</h1>"));
}

#[test]
fn build_directory_uses_config_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("syntaq.json"),
        r#"{ "html": { "stylesheet": "/site.css" }, "build": { "outDir": "public" } }"#,
    )
    .unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("nested")).unwrap();
    fs::write(docs.join("index.syntaq"), "= Home").unwrap();
    fs::write(docs.join("nested/page.syntaq"), "= Page\n[[index.html|home]]").unwrap();

    let output = run(&dir, &["build", "docs", "--quiet"]);
    assert!(output.status.success());

    let public = dir.path().join("public");
    let index = fs::read_to_string(public.join("index.html")).unwrap();
    assert!(index.contains("<link rel=\"stylesheet\" href=\"/site.css\">"));
    let page = fs::read_to_string(public.join("nested/page.html")).unwrap();
    assert!(page.contains("<a href=\"index.html\">home</a>"));
}

#[test]
fn outline_prints_heading_tree() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["outline", fixture("reference.syntaq").to_str().unwrap()]);

    assert!(output.status.success());
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines[0], "Syntaq Reference #syntaq-reference");
    assert_eq!(lines[1], "  Lists #lists");
    assert_eq!(lines.len(), 5);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["render", "nope.syntaq"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read 'nope.syntaq'"));
}

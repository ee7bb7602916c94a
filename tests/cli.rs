//! End-to-end tests for the chapter-fix binary.
//!
//! Each test writes a session file into a temp dir and runs the binary there.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

fn chapter_fix_in(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chapter-fix"));
    cmd.current_dir(dir).env("RUST_LOG", "info");
    cmd
}

fn write_session(dir: &Path, value: &Value) {
    fs::write(dir.join("session.json"), value.to_string()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn numbers(session: &Value) -> Vec<u64> {
    session["chapters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["chapterNumber"].as_u64().unwrap())
        .collect()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "chapter-fix failed: {}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn repairs_session_and_writes_backup() {
    let dir = TempDir::new().unwrap();
    let original = json!({
        "novel": { "slug": "eternal-life", "title": "永生" },
        "chapters": [
            { "title": "Chapter 1", "chapterNumber": null },
            { "title": "Chapter 2", "chapterNumber": null },
            { "title": "Some Untitled", "chapterNumber": 5 }
        ]
    });
    write_session(dir.path(), &original);

    let output = chapter_fix_in(dir.path())
        .arg("session.json")
        .output()
        .unwrap();
    assert_success(&output);

    let fixed = read_json(&dir.path().join("session.json"));
    assert_eq!(numbers(&fixed), vec![1, 2, 3]);
    assert_eq!(fixed["novel"], original["novel"]);
    assert_eq!(read_json(&dir.path().join("session.json.bak")), original);

    let text = fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(text.contains("永生"));
    assert!(text.starts_with("{\n  \"novel\""));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fix:"));
    assert!(stdout.contains("Ch #3"));
    assert!(stdout.contains("会话文件: session.json"));
    assert!(output.stderr.is_empty());
}

#[test]
fn already_correct_session_still_gets_backup() {
    let dir = TempDir::new().unwrap();
    let original = json!({
        "chapters": [
            { "title": "第一章 初入", "chapterNumber": 1 },
            { "title": "第2章", "chapterNumber": 2 },
            { "title": "3 - 风起", "chapterNumber": 3 }
        ]
    });
    write_session(dir.path(), &original);

    let output = chapter_fix_in(dir.path())
        .arg("session.json")
        .output()
        .unwrap();
    assert_success(&output);

    assert_eq!(read_json(&dir.path().join("session.json")), original);
    assert_eq!(read_json(&dir.path().join("session.json.bak")), original);
}

#[test]
fn missing_input_exits_with_distinct_code() {
    let dir = TempDir::new().unwrap();

    let output = chapter_fix_in(dir.path())
        .arg("session.json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(!dir.path().join("session.json.bak").exists());

    // 致命错误走 stderr，不混进进度日志
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stderr.contains("session.json 不存在"), "{stderr}");
    assert!(!stdout.contains("不存在"), "{stdout}");
}

#[test]
fn malformed_json_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("session.json"), "{ not json").unwrap();

    let output = chapter_fix_in(dir.path())
        .arg("session.json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("不是有效的 JSON"));
    assert_eq!(
        fs::read_to_string(dir.path().join("session.json")).unwrap(),
        "{ not json"
    );
    assert!(!dir.path().join("session.json.bak").exists());
}

#[test]
fn no_session_configured_is_an_error() {
    let dir = TempDir::new().unwrap();
    let output = chapter_fix_in(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn dry_run_leaves_files_alone() {
    let dir = TempDir::new().unwrap();
    let content = r#"{"chapters":[{"title":"Ch. 7","chapterNumber":6}]}"#;
    fs::write(dir.path().join("session.json"), content).unwrap();

    let output = chapter_fix_in(dir.path())
        .args(["session.json", "--dry-run"])
        .output()
        .unwrap();
    assert_success(&output);

    assert_eq!(
        fs::read_to_string(dir.path().join("session.json")).unwrap(),
        content
    );
    assert!(!dir.path().join("session.json.bak").exists());
}

#[test]
fn config_file_supplies_path_and_suffix() {
    let dir = TempDir::new().unwrap();
    write_session(dir.path(), &json!({ "chapters": [{ "title": "Chapter 9" }] }));
    fs::write(
        dir.path().join("chapter-fix.toml"),
        "session = \"session.json\"\nbackup_suffix = \"orig.json\"\nindent = 4\n",
    )
    .unwrap();

    let output = chapter_fix_in(dir.path()).output().unwrap();
    assert_success(&output);

    assert!(dir.path().join("session.orig.json").exists());
    let text = fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(text.starts_with("{\n    \"chapters\""));
    assert_eq!(numbers(&read_json(&dir.path().join("session.json"))), vec![9]);
}

#[test]
fn cli_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    write_session(dir.path(), &json!({ "chapters": [{ "title": "Ch 2" }] }));
    fs::write(dir.path().join("fix.toml"), "backup_suffix = \"orig.json\"\n").unwrap();

    let output = chapter_fix_in(dir.path())
        .args(["session.json", "--config", "fix.toml", "--backup-suffix", "bak"])
        .output()
        .unwrap();
    assert_success(&output);

    assert!(dir.path().join("session.bak").exists());
    assert!(!dir.path().join("session.orig.json").exists());
}

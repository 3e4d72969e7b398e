//! Integration tests for the passgen binary
//!
//! Each test runs the real binary in a scratch directory holding a
//! `passgen.toml` and a set of templates.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use passgen_ooxml::test_utils::docx_with_paragraphs;
use passgen_ooxml::{Document, OoxmlArchive};
use tempfile::TempDir;

const KEY_ENV: &str = "PASSGEN_TEST_ACCESS_KEY";

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("passgen.toml"),
        format!(
            r#"
[output]
dir = "out"
work_dir = "work"

[export]
converters = []

[access]
key_env = "{KEY_ENV}"
"#
        ),
    )
    .unwrap();

    let templates = dir.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("foh_pass_template.docx"),
        docx_with_paragraphs(&["FOH {{ EventName }}", "Pass {{ PassNumber }}"]),
    )
    .unwrap();
    fs::write(
        templates.join("boh_pass_template.docx"),
        docx_with_paragraphs(&["BOH {{ EventName }}", "Pass {{ PassNumber }}"]),
    )
    .unwrap();
    fs::write(
        templates.join("load_unload_template.docx"),
        docx_with_paragraphs(&["{{ TimeEntered }}", "{{ Deck }}"]),
    )
    .unwrap();
    dir
}

fn passgen(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_passgen"))
        .args(args)
        .current_dir(dir)
        .env(KEY_ENV, "open-sesame")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn texts(path: &Path) -> Vec<String> {
    let archive = OoxmlArchive::open(path).unwrap();
    Document::from_archive(&archive)
        .unwrap()
        .texts()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn work_is_empty(dir: &Path) -> bool {
    match fs::read_dir(dir.join("work")) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

#[test]
fn test_console_generates_passes() {
    let dir = workspace();
    let output = passgen(
        dir.path(),
        &["console"],
        "1\nSummer Fest\n07/24/2025\n555-1234\n3\n\n",
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("✅ Done! File saved to: out/Summer Fest_Passes.docx"), "{stdout}");

    let result = dir.path().join("out").join("Summer Fest_Passes.docx");
    assert_eq!(
        texts(&result),
        vec![
            "FOH Summer Fest",
            "Pass 1",
            "FOH Summer Fest",
            "Pass 2",
            "FOH Summer Fest",
            "Pass 3"
        ]
    );
    assert!(work_is_empty(dir.path()));
}

#[test]
fn test_console_invalid_choice_exits_nonzero() {
    let dir = workspace();
    let output = passgen(dir.path(), &["console"], "4\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid choice '4'"), "{stderr}");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_console_invalid_count_exits_nonzero() {
    let dir = workspace();
    let output = passgen(dir.path(), &["console"], "2\nGala\nd\np\nlots\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid number of passes 'lots'"), "{stderr}");
}

#[test]
fn test_console_no_content_is_success() {
    let dir = workspace();
    // load/unload template only shows TimeEntered and Deck, both left empty
    let output = passgen(dir.path(), &["console"], "3\nEmpty\nd\np\n\n\n2\n\n");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("No non-blank pages found"), "{stdout}");
    assert!(!dir.path().join("out").join("Empty_Passes.docx").exists());
    assert!(work_is_empty(dir.path()));
}

#[test]
fn test_form_with_key_prints_download() {
    let dir = workspace();
    let output = passgen(
        dir.path(),
        &[
            "form",
            "--pass-type",
            "boh",
            "--event-name",
            "A/B:Test",
            "--count",
            "2",
            "--format",
            "pdf",
            "--key",
            "open-sesame",
        ],
        "",
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "generated");
    assert_eq!(json["file_name"], "A_B_Test_Passes.docx");
    assert_eq!(json["format"], "docx");
    assert!(json["warning"].as_str().unwrap().contains("Serving DOCX instead"));
    assert!(dir.path().join("out").join("A_B_Test_Passes.docx").is_file());
}

#[test]
fn test_form_prompts_for_key() {
    let dir = workspace();
    let output = passgen(
        dir.path(),
        &["form", "--pass-type", "foh", "--event-name", "Gala"],
        "open-sesame\n",
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Enter Access Key: "));
}

#[test]
fn test_form_wrong_key_is_denied() {
    let dir = workspace();
    let output = passgen(
        dir.path(),
        &["form", "--pass-type", "foh", "--event-name", "Gala", "--key", "guess"],
        "",
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("Access denied. Please enter the correct access key."),
        "{stderr}"
    );
    assert!(output.stdout.is_empty());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = workspace();
    let output = passgen(dir.path(), &["--config", "nope.toml", "console"], "");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("nope.toml"), "{stderr}");
}

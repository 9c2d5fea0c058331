use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

fn filekit_cmd() -> Command {
    Command::cargo_bin("filekit").expect("Failed to find filekit binary")
}

#[test]
fn test_no_arguments_prints_help() {
    filekit_cmd()
        .assert()
        .success()
        .stdout(contains("Usage: filekit [OPTIONS] COMMAND [ARGS]..."))
        .stdout(contains("clean"))
        .stdout(contains("extract"));
}

#[test]
fn test_version_flag() {
    filekit_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("{}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_clean_prints_one_name_per_line() {
    filekit_cmd()
        .args(["clean", "-n", "03 - intro.MP4", "-n", "notes (final).txt"])
        .assert()
        .success()
        .stdout("Intro.MP4\nNotes Final.txt\n");
}

#[test]
fn test_clean_help_lists_format_flags() {
    filekit_cmd()
        .args(["clean", "--help"])
        .assert()
        .success()
        .stdout(contains("--keep-numbers"))
        .stdout(contains("--text, --json"));
}

#[test]
fn test_extract_text_file_as_json() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("notes.txt");
    std::fs::write(&source, "Attach budget.xlsx and slides.pptx\nbudget.xlsx again\n")?;

    let output = filekit_cmd()
        .args(["extract", source.to_str().unwrap(), "--json"])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["kind"], "text");
    assert_eq!(json["names"], serde_json::json!(["budget.xlsx", "slides.pptx"]));
    Ok(())
}

#[test]
fn test_config_file_is_shared_with_subcommand() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("filekit.toml");
    std::fs::write(&config, "keep_numbers = true\n")?;

    filekit_cmd()
        .args(["-c", config.to_str().unwrap(), "clean", "-n", "track 7.flac"])
        .assert()
        .success()
        .stdout("Track 7.flac\n");
    Ok(())
}

#[test]
fn test_missing_source_fails_with_message() {
    filekit_cmd()
        .args(["extract", "surely/this/does/not/exist.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("does not exist"));
}

#[test]
fn test_unknown_flag_fails() {
    filekit_cmd()
        .args(["clean", "--bogus"])
        .assert()
        .failure()
        .stderr(contains("Extra argument provided with flag `--bogus`"))
        .stdout(predicate::str::is_empty());
}

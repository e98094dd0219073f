//! CLI contract tests for the bt binary.
//!
//! Failure behavior is part of the contract: every fault surfaces as one
//! printed line and the process still exits zero.

use assert_cmd::Command;
use predicates::prelude::*;

fn bt() -> Command {
    Command::cargo_bin("bt").expect("bt binary builds")
}

#[test]
fn build_with_missing_tool_prints_one_fault_line_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();

    let assert = bt().current_dir(dir.path()).arg("build").assert();
    let output = assert.get_output().stdout.clone();

    assert
        .success()
        .stdout(predicate::str::contains("Command Launch Failed"))
        .stdout(predicate::str::contains("./gradlew"));

    let printed = String::from_utf8(output).unwrap();
    assert_eq!(printed.lines().count(), 1, "exactly one fault line: {printed:?}");
    assert!(!printed.contains('\x1b'), "no ANSI when stdout is a pipe");
}

#[test]
fn bare_invocation_defaults_to_build() {
    let dir = tempfile::tempdir().unwrap();

    bt().current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Command Launch Failed"));
}

#[test]
fn scrape_rejects_non_integer_count_before_downloading() {
    let dir = tempfile::tempdir().unwrap();

    bt().current_dir(dir.path())
        .arg("scrape")
        .write_stdin("kittens\nabc\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid Input"))
        .stdout(predicate::str::contains("abc"))
        .stdout(predicate::str::contains("Saved").not());

    // Validation fired before any filesystem work.
    assert!(!dir.path().join("scraped_images").exists());
}

#[test]
fn version_subcommand_prints_version() {
    bt().arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bt "));
}

#[test]
fn help_lists_subcommands() {
    bt().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("scrape"));
}

#[test]
fn global_flags_are_accepted() {
    let dir = tempfile::tempdir().unwrap();

    bt().current_dir(dir.path())
        .args(["-q", "--no-color", "--log-format", "jsonl", "build"])
        .assert()
        .success();
}

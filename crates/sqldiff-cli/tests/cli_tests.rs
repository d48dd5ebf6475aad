//! CLI integration tests for sqldiff.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for error conditions that need no database.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the sqldiff binary.
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("sqldiff").unwrap();
    cmd.env_remove("SQLDIFF_DSN");
    cmd
}

/// A DSN nothing listens on.
const UNREACHABLE_DSN: &str = "root:pw@tcp(127.0.0.1:1)/test";

fn dbinfo_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dsn"))
        .stdout(predicate::str::contains("--table1"))
        .stdout(predicate::str::contains("--table2"))
        .stdout(predicate::str::contains("--column"))
        .stdout(predicate::str::contains("--modified"))
        .stdout(predicate::str::contains("--print-header"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sqldiff"));
}

// =============================================================================
// Flag Defaults
// =============================================================================

#[test]
fn test_column_default() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: *]"));
}

#[test]
fn test_align_values() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("positional"))
        .stdout(predicate::str::contains("key"));
}

#[test]
fn test_verbosity_default() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: warn]"));
}

#[test]
fn test_dsn_env_is_documented() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SQLDIFF_DSN"));
}

// =============================================================================
// Exit Code Tests - Usage Errors (Exit Code 2)
// =============================================================================

#[test]
fn test_missing_tables_exits_with_code_2() {
    cmd()
        .args(["--dsn", UNREACHABLE_DSN])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--table1"));
}

#[test]
fn test_unknown_align_exits_with_code_2() {
    cmd()
        .args(["--dsn", UNREACHABLE_DSN, "--table1", "a", "--table2", "b"])
        .args(["--align", "fuzzy"])
        .assert()
        .code(2);
}

// =============================================================================
// Exit Code Tests - Config Errors (Exit Code 2)
// =============================================================================

#[test]
fn test_invalid_dsn_exits_with_code_2() {
    cmd()
        .args(["--dsn", "root@localhost/test", "--table1", "a", "--table2", "b"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid DSN format"));
}

#[test]
fn test_invalid_dsn_does_not_echo_password() {
    cmd()
        .args(["--dsn", "root:hunter2@tcp(localhost:3306)/", "--table1", "a", "--table2", "b"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("hunter2").not());
}

#[test]
fn test_invalid_dbinfo_json_exits_with_code_2() {
    let file = dbinfo_file("{ \"database\": ");

    cmd()
        .args(["--dsn", file.path().to_str().unwrap(), "--table1", "a", "--table2", "b"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("JSON error"));
}

#[test]
fn test_missing_dbinfo_json_exits_with_code_2() {
    cmd()
        .args(["--dsn", "nonexistent_dbinfo.json", "--table1", "a", "--table2", "b"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_unknown_driver_exits_with_code_2() {
    cmd()
        .args(["--dsn", UNREACHABLE_DSN, "--table1", "a", "--table2", "b"])
        .args(["--driver", "postgres"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown driver"));
}

#[test]
fn test_bad_key_column_exits_with_code_2() {
    cmd()
        .args(["--dsn", UNREACHABLE_DSN, "--table1", "a", "--table2", "b"])
        .args(["--key", "id; DROP TABLE a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("key column"));
}

// =============================================================================
// Exit Code Tests - Connection Errors (Exit Code 2)
// =============================================================================

#[test]
fn test_unreachable_server_exits_with_code_2() {
    cmd()
        .args(["--dsn", UNREACHABLE_DSN, "--table1", "a", "--table2", "b"])
        .args(["--connect-timeout", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Connection error"));
}

#[test]
fn test_dsn_from_environment() {
    cmd()
        .env("SQLDIFF_DSN", UNREACHABLE_DSN)
        .args(["--table1", "a", "--table2", "b", "--connect-timeout", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Connection error"));
}

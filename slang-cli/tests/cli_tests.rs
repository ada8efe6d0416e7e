//! Integration tests for the S-language CLI.
//!
//! These tests invoke the `slang` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn slang() -> Command {
    Command::cargo_bin("slang").unwrap()
}

/// Return the workspace root (parent of slang-cli/).
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Return the absolute path to a test program file as a string argument.
fn test_program(name: &str) -> String {
    workspace_root()
        .join("tests/programs")
        .join(name)
        .to_str()
        .unwrap()
        .to_string()
}

fn write_temp(dir: &TempDir, name: &str, text: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path.to_str().unwrap().to_string()
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    slang()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: slang"));
}

#[test]
fn help_flag_exits_0() {
    slang()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    slang()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

// ---- Verify ----

#[test]
fn verify_sample_program() {
    slang()
        .args(["verify", &test_program("add.sl")])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK:"))
        .stdout(predicate::str::contains("(1 instructions, 2 functions)"));
}

#[test]
fn verify_reports_undefined_label_with_exit_2() {
    slang()
        .args(["verify", &test_program("bad_label.sl")])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("undefined label L7"));
}

#[test]
fn verify_missing_file_exits_1() {
    slang()
        .args(["verify", "/nonexistent/program.sl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn assembly_error_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = write_temp(&dir, "bad.sl", "INCREASE y\nBOGUS x1\n");
    slang()
        .args(["verify", &input])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 2: unknown mnemonic 'BOGUS'"));
}

// ---- Run ----

#[test]
fn run_add() {
    slang()
        .args(["run", &test_program("add.sl"), "2", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("y = 5\n"))
        .stdout(predicate::str::contains("cycles = "));
}

#[test]
fn run_fully_expanded_gives_same_result() {
    slang()
        .args(["run", &test_program("add.sl"), "4", "2", "--degree", "max"])
        .assert()
        .success()
        .stdout(predicate::str::contains("y = 6\n"));
}

#[test]
fn run_with_trace_prints_snapshots() {
    slang()
        .args(["run", &test_program("copy.sl"), "2", "--trace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("x1=2"))
        .stdout(predicate::str::contains("y = 2\n"));
}

#[test]
fn run_step_limit_stops_infinite_loop() {
    slang()
        .args(["run", &test_program("forever.sl"), "--max-steps", "100"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("step limit of 100"));
}

#[test]
fn run_step_limit_bounds_an_expanded_callee() {
    slang()
        .args(["run", &test_program("forever_call.sl"), "--degree", "max", "--max-steps", "200"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("step limit of 200"));
}

#[test]
fn help_describes_step_limit_scope() {
    slang()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("--max-steps counts main-program steps only"));
}

#[test]
fn run_step_limit_not_hit_by_short_program() {
    // With x1 = 0 the program exits on its first instruction.
    slang()
        .args(["run", &test_program("copy.sl"), "--max-steps", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("y = 0\n"));
}

#[test]
fn run_invalid_input_exits_1() {
    slang()
        .args(["run", &test_program("copy.sl"), "abc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid input value 'abc'"));
}

#[test]
fn run_unknown_option_exits_1() {
    slang()
        .args(["run", &test_program("copy.sl"), "--fast"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown option '--fast'"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    slang()
        .env("RUST_LOG", "debug")
        .args(["run", &test_program("constant.sl")])
        .assert()
        .success()
        .stdout(predicate::str::contains("y = 3\n"))
        .stderr(predicate::str::contains("program loaded"));
}

// ---- List ----

#[test]
fn list_shows_table_and_summary() {
    slang()
        .args(["list", &test_program("constant.sl")])
        .assert()
        .success()
        .stdout(predicate::str::contains("y ← 3"))
        .stdout(predicate::str::contains("instructions = 1"))
        .stdout(predicate::str::contains("cost = "))
        .stdout(predicate::str::contains("nesting = 0"));
}

#[test]
fn list_after_full_expansion_has_degree_zero() {
    slang()
        .args(["list", &test_program("add.sl"), "--degree", "max"])
        .assert()
        .success()
        .stdout(predicate::str::contains("degree = 0"));
}

#[test]
fn list_rejects_bad_degree() {
    slang()
        .args(["list", &test_program("add.sl"), "--degree", "lots"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid degree"));
}

// ---- Expand ----

#[test]
fn expand_writes_runnable_source() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("expanded.sl");
    slang()
        .args([
            "expand",
            &test_program("add.sl"),
            "--degree",
            "max",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("expanded 1 instructions"));

    let text = fs::read_to_string(&output).unwrap();
    let module = slang_assembler::assemble(&text).unwrap();
    assert!(module
        .program
        .instructions
        .iter()
        .all(|i| i.kind().is_basic()));

    slang()
        .args(["run", output.to_str().unwrap(), "3", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("y = 7\n"));
}

#[test]
fn expand_to_stdout() {
    slang()
        .args(["expand", &test_program("constant.sl"), "--degree", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("PROGRAM Three\n"))
        .stdout(predicate::str::contains("ZERO_VARIABLE y"));
}

#[test]
fn expand_requires_degree() {
    slang()
        .args(["expand", &test_program("constant.sl")])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires --degree"));
}

// ---- Lineage ----

#[test]
fn lineage_prints_chain_to_source() {
    let assert = slang()
        .args(["lineage", &test_program("constant.sl"), "1", "--degree", "2"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output:\n{stdout}");
    assert!(lines[0].trim_start().starts_with('2'));
    assert!(lines[1].contains("y ← 0"));
    assert!(lines[2].contains("y ← 3"));
}

#[test]
fn lineage_position_out_of_range_exits_1() {
    slang()
        .args(["lineage", &test_program("constant.sl"), "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("outside 1..=1"));
}

// e2e/cli_integration.rs — CLI integration tests.
//
// Tests the `linepipe` binary as a black-box filter using
// std::process::Command. Covers the option surface, help/version
// handling, exit codes, and configuration failures. Stdin is always
// piped here, so the binary sees a non-interactive input source.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Locate the `linepipe` binary produced by Cargo.
fn linepipe_bin() -> PathBuf {
    // CARGO_BIN_EXE_linepipe is set by Cargo when running integration tests.
    // Fall back to walking up from the test binary location.
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_linepipe") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop(); // remove test binary filename
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("linepipe");
    p
}

/// Run the binary with `args`, feeding `input` on stdin, and collect
/// stdout/stderr/status.
fn run_with_input(args: &[&str], input: &str) -> std::process::Output {
    let mut child = Command::new(linepipe_bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn linepipe");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("failed to wait on linepipe")
}

// ── 1. Piped stdin flows through to stdout ───────────────────────────────────

#[test]
fn test_cli_pipes_stdin_to_stdout() {
    let output = run_with_input(&[], "alpha\nbeta\n");
    assert!(output.status.success(), "pipe run should exit 0");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "alpha\nbeta\n");
}

// ── 2. Echo marks each raw line ──────────────────────────────────────────────

#[test]
fn test_cli_echo_marks_each_line() {
    let output = run_with_input(&["--echo"], "alpha\nbeta\n");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "#> alpha\nalpha\n#> beta\nbeta\n"
    );
}

#[test]
fn test_cli_no_echo_no_marker() {
    let output = run_with_input(&[], "alpha\nbeta\n");
    assert!(
        !String::from_utf8_lossy(&output.stdout).contains("#> "),
        "marker must not appear without --echo"
    );
}

// ── 3. Empty input ───────────────────────────────────────────────────────────

#[test]
fn test_cli_empty_stdin_empty_stdout() {
    let output = run_with_input(&[], "");
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "no lines in, no lines out");
}

// ── 4. --help ────────────────────────────────────────────────────────────────

#[test]
fn test_cli_help() {
    let output = Command::new(linepipe_bin())
        .arg("--help")
        .output()
        .expect("failed to run linepipe --help");

    assert!(
        output.status.success(),
        "--help should exit 0; status: {}",
        output.status
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.to_lowercase().contains("usage"),
        "--help output should contain 'usage'; got: {stdout}"
    );
    assert!(
        stdout.contains("--echo"),
        "--help output should list the echo switch; got: {stdout}"
    );
}

// ── 5. --version ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_version() {
    let output = Command::new(linepipe_bin())
        .arg("--version")
        .output()
        .expect("failed to run linepipe --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0.1.0"),
        "--version stdout should contain '0.1.0'; got: {stdout}"
    );
}

// ── 6. Configuration failures ────────────────────────────────────────────────

#[test]
fn test_cli_missing_input_file_fails() {
    let output = run_with_input(&["--file", "/nonexistent/linepipe-input.txt"], "");
    assert!(
        !output.status.success(),
        "missing input file must exit non-zero"
    );
    assert!(
        output.stdout.is_empty(),
        "no output may be written before the failure"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("/nonexistent/linepipe-input.txt"),
        "the error should name the offending path; got: {stderr}"
    );
}

#[test]
fn test_cli_unknown_flag_fails() {
    let output = run_with_input(&["--bogus"], "");
    assert!(!output.status.success(), "unknown flags must exit non-zero");
}

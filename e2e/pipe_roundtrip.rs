// e2e/pipe_roundtrip.rs — file-to-file data flow tests.
//
// Drives the `linepipe` binary over staged input files with `-f`/`-o`
// and checks the bytes that come out the other side.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Locate the `linepipe` binary produced by Cargo.
fn linepipe_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_linepipe") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("linepipe");
    p
}

/// Create a TempDir holding an input file with the given contents.
fn make_input(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.txt");
    fs::write(&input_path, contents).unwrap();
    (dir, input_path)
}

// ── 1. File to file ──────────────────────────────────────────────────────────

#[test]
fn test_file_to_file_round_trip() {
    let (dir, input) = make_input("a\nb\nc\n");
    let output = dir.path().join("output.txt");

    let status = Command::new(linepipe_bin())
        .args([
            "-f",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .stdin(Stdio::null())
        .status()
        .expect("failed to run linepipe");

    assert!(status.success());
    assert_eq!(fs::read_to_string(&output).unwrap(), "a\nb\nc\n");
}

// ── 2. File to stdout ────────────────────────────────────────────────────────

#[test]
fn test_file_to_stdout() {
    let (_dir, input) = make_input("one\ntwo\n");

    let output = Command::new(linepipe_bin())
        .args(["-f", input.to_str().unwrap()])
        .stdin(Stdio::null())
        .output()
        .expect("failed to run linepipe");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "one\ntwo\n");
}

// ── 3. Echo interleaving through files ───────────────────────────────────────

#[test]
fn test_echo_file_round_trip() {
    let (dir, input) = make_input("a\nb\nc\n");
    let output = dir.path().join("output.txt");

    let status = Command::new(linepipe_bin())
        .args([
            "-e",
            "-f",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .stdin(Stdio::null())
        .status()
        .expect("failed to run linepipe");

    assert!(status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "#> a\na\n#> b\nb\n#> c\nc\n"
    );
}

// ── 4. Output file is truncated, not appended ────────────────────────────────

#[test]
fn test_output_file_is_truncated() {
    let (dir, input) = make_input("new\n");
    let output = dir.path().join("output.txt");
    fs::write(&output, "stale text that must disappear\n").unwrap();

    let status = Command::new(linepipe_bin())
        .args([
            "-f",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .stdin(Stdio::null())
        .status()
        .expect("failed to run linepipe");

    assert!(status.success());
    assert_eq!(fs::read_to_string(&output).unwrap(), "new\n");
}

// ── 5. Unterminated final line ───────────────────────────────────────────────

#[test]
fn test_unterminated_final_line_gets_a_newline() {
    let (_dir, input) = make_input("a\nb");

    let output = Command::new(linepipe_bin())
        .args(["-f", input.to_str().unwrap()])
        .stdin(Stdio::null())
        .output()
        .expect("failed to run linepipe");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "a\nb\n");
}

// ── 6. Failed input open leaves the output target alone ──────────────────────

#[test]
fn test_missing_input_leaves_output_uncreated() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output.txt");

    let status = Command::new(linepipe_bin())
        .args([
            "-f",
            "/nonexistent/input.txt",
            "-o",
            output.to_str().unwrap(),
        ])
        .stdin(Stdio::null())
        .status()
        .expect("failed to run linepipe");

    assert!(!status.success());
    assert!(
        !output.exists(),
        "the output file must not be created when the input cannot be opened"
    );
}

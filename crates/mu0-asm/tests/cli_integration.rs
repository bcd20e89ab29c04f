//! Integration tests for the mu0 CLI.

use mu0_asm as _;
use mu0_core as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mu0"))
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write temp source");
    path
}

fn run_mu0(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("failed to run mu0")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

const DOUBLING: &str = "\
INI 0x10 0x005 ; value to double
LOAD 0x10
ADD 0x10
STORE 0x11
STOP
";

#[test]
fn runs_program_and_dumps_memory() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "double.mu0", DOUBLING);

    let output = run_mu0(&[path_arg(&source)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("### Parsing source file ..."));
    assert!(stdout.contains("Recognized: INI 0x10 0x005 ; value to double"));
    assert!(stdout.contains("### Reached STOP instruction at line 5."));
    assert!(stdout.contains("  @0x011: 0x00a (dec: 10)"));
}

#[test]
fn reports_end_of_instructions() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "end.mu0", "INI 0x1 0x001\nLOAD 0x1\n");

    let output = run_mu0(&[path_arg(&source)]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("### Reached end of instructions."));
}

#[test]
fn syntax_error_names_line_and_text() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "bad.mu0", "LOAD 0x1\nXYZ 0x1\n");

    let output = run_mu0(&[path_arg(&source)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.mu0:2: error: unknown mnemonic `XYZ`"));
    assert!(stderr.contains("\"XYZ 0x1\""));
}

#[test]
fn runtime_fault_exits_non_zero() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "fault.mu0", "LOAD 0x44\nSTOP\n");

    let output = run_mu0(&[path_arg(&source)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 1: invalid memory access at address 0x044"));
}

#[test]
fn missing_source_file() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let missing = temp_dir.path().join("nope.mu0");

    let output = run_mu0(&[path_arg(&missing)]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("source file not found"));
}

#[test]
fn missing_source_parameter() {
    let output = run_mu0(&[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing source file parameter"));
}

#[test]
fn unknown_option_is_rejected() {
    let output = run_mu0(&["-q", "prog.mu0"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unrecognized option \"-q\""));
}

#[test]
fn step_mode_reads_confirmations_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "double.mu0", DOUBLING);

    let mut child = Command::new(binary_path())
        .args(["-s", path_arg(&source)])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to run mu0");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(b"\n\n\n\n")
        .expect("write confirmations");
    let output = child.wait_with_output().expect("mu0 exits");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Press ENTER for next instruction").count(), 3);
    assert!(stdout.contains("Comment: None"));
    assert!(stdout.contains("  Current PC value:  0x003"));
}

#[test]
fn step_mode_stops_when_stdin_is_closed() {
    use std::process::Stdio;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "loop.mu0", "JUMP 0x0\n");

    let output = Command::new(binary_path())
        .args(["--step", path_arg(&source)])
        .stdin(Stdio::null())
        .output()
        .expect("failed to run mu0");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Executed line 1").count(), 1);
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("error: input closed after 1 instructions"));
}

#[test]
fn step_limit_stops_runaway_loop() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "loop.mu0", "JUMP 0x0\n");

    let output = run_mu0(&["--max-steps", "1000", path_arg(&source)]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("step limit reached after 1000 instructions"));
}

#[test]
fn trace_goes_to_stderr() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "double.mu0", DOUBLING);

    let output = run_mu0(&["--trace", path_arg(&source)]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("trace: fetch 0x000 (line 2)"));
    assert!(stderr.contains("trace: write [0x011] = 10"));
}

const PASSING_TEST_CONTENT: &str = "\
# Doubling

```mu0
INI 0x10 0xFFE
LOAD 0x10
ADD 0x10
STOP
```

```mu0test
ACC == -4
[0x10] == 0xFFE
END == halted
```
";

#[test]
fn test_command_passes() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "double.md", PASSING_TEST_CONTENT);

    let output = run_mu0(&["--test", path_arg(&source)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PASS (lines 10-14): 3 assertions"));
    assert!(stdout.contains("Test Summary: 1 passed, 0 failed (total: 1)"));
}

#[test]
fn test_command_fails_on_wrong_value() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let content = PASSING_TEST_CONTENT.replace("ACC == -4", "ACC == 4");
    let source = create_temp_file(temp_dir.path(), "double.md", &content);

    let output = run_mu0(&["--test", path_arg(&source)]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAIL: ACC == 4 (got -4)"));
}

#[test]
fn test_command_without_blocks() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let source = create_temp_file(temp_dir.path(), "plain.mu0", DOUBLING);

    let output = run_mu0(&["--test", path_arg(&source)]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No test blocks found"));
}

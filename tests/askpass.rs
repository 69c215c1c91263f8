//! End-to-end tests for the dexec-askpass helper.
//!
//! These spawn the real binary and drive it over stdin/stdout, checking
//! the process contract: secret echoed once on success, the fixed timeout
//! diagnostic on stderr, and distinct exit codes per failure class.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_dexec-askpass");

/// Spawn the helper with a config file setting the given timeout.
fn spawn_askpass(temp: &TempDir, timeout_millis: u64) -> Child {
    let config_path = temp.path().join("askpass.toml");
    std::fs::write(
        &config_path,
        format!("[askpass]\ntimeout_millis = {timeout_millis}\n"),
    )
    .expect("failed to write config");

    Command::new(BIN)
        .env("DEXEC_ASKPASS_CONFIG", &config_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn dexec-askpass")
}

#[test]
fn test_secret_echoed_with_exit_zero() {
    let temp = TempDir::new().unwrap();
    let mut child = spawn_askpass(&temp, 1_000);

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"hunter2\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "status: {:?}", output.status);
    assert_eq!(output.stdout, b"hunter2\n");
}

#[test]
fn test_empty_line_yields_empty_secret() {
    let temp = TempDir::new().unwrap();
    let mut child = spawn_askpass(&temp, 1_000);

    child.stdin.take().unwrap().write_all(b"\n").unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"\n");
}

#[test]
fn test_timeout_prints_fixed_diagnostic() {
    let temp = TempDir::new().unwrap();
    let mut child = spawn_askpass(&temp, 300);

    // Keep stdin open without writing so the helper times out rather than
    // seeing EOF.
    let stdin = child.stdin.take().unwrap();

    let start = Instant::now();
    let output = child.wait_with_output().unwrap();
    let elapsed = start.elapsed();
    drop(stdin);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid sudo password"),
        "stderr: {stderr}"
    );
    assert!(elapsed >= Duration::from_millis(300));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_eof_without_terminator_exits_with_malformed_code() {
    let temp = TempDir::new().unwrap();
    let mut child = spawn_askpass(&temp, 1_000);

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"no terminator").unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_max_length_secret_round_trips() {
    let temp = TempDir::new().unwrap();
    let mut child = spawn_askpass(&temp, 1_000);

    let secret = vec![b'x'; 1023];
    let mut input = secret.clone();
    input.push(b'\n');
    child.stdin.take().unwrap().write_all(&input).unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, input);
}

#[test]
fn test_bad_config_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("askpass.toml");
    std::fs::write(&config_path, "[askpass]\ntimeout_millis = 0\n").unwrap();

    let output = Command::new(BIN)
        .env("DEXEC_ASKPASS_CONFIG", &config_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    // Config failures get their own code, distinct from capture-time
    // resource failures.
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("timeout_millis"), "stderr: {stderr}");
}

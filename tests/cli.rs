#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn run_injects_file_variables_into_child() {
    let dir = make_temp_dir("inject");
    write_file(&dir.join(".env"), "GREETING=hello\n");

    let output = run_envfile(&dir, &["run", "--", "printenv", "GREETING"], None);
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "hello");
}

#[test]
fn run_resolves_interpolation_against_inherited_env() {
    let dir = make_temp_dir("interp");
    write_file(&dir.join(".env"), "COMBINED=${FROM_PARENT}-suffix\n");

    let output = run_envfile(
        &dir,
        &["run", "--", "printenv", "COMBINED"],
        Some(("FROM_PARENT", "inherited")),
    );
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "inherited-suffix");
}

#[test]
fn run_clobbers_inherited_variables_by_default() {
    let dir = make_temp_dir("clobber");
    write_file(&dir.join(".env"), "WINNER=file\n");

    let output = run_envfile(
        &dir,
        &["run", "--", "printenv", "WINNER"],
        Some(("WINNER", "inherited")),
    );
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "file");
}

#[test]
fn no_clobber_keeps_inherited_variables() {
    let dir = make_temp_dir("no-clobber");
    write_file(&dir.join(".env"), "WINNER=file\n");

    let output = run_envfile(
        &dir,
        &["run", "--no-clobber", "--", "printenv", "WINNER"],
        Some(("WINNER", "inherited")),
    );
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "inherited");
}

#[test]
fn run_accepts_multiple_files_in_order() {
    let dir = make_temp_dir("multi");
    write_file(&dir.join("base.env"), "A=base\nK=base\n");
    write_file(&dir.join("local.env"), "K=local\n");

    let output = run_envfile(
        &dir,
        &[
            "run",
            "-f",
            "base.env,local.env",
            "--",
            "sh",
            "-c",
            "printf '%s %s' \"$A\" \"$K\"",
        ],
        None,
    );
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "base local");
}

#[test]
fn run_skips_missing_files() {
    let dir = make_temp_dir("missing");
    write_file(&dir.join("present.env"), "A=here\n");

    let output = run_envfile(
        &dir,
        &[
            "run",
            "-f",
            "absent.env",
            "-f",
            "present.env",
            "--",
            "printenv",
            "A",
        ],
        None,
    );
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "here");
}

#[test]
fn no_interpolation_keeps_placeholders_literal() {
    let dir = make_temp_dir("no-interp");
    write_file(&dir.join(".env"), "RAW=${NOT_EXPANDED}\n");

    let output = run_envfile(
        &dir,
        &["run", "--no-interpolation", "--", "printenv", "RAW"],
        None,
    );
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "${NOT_EXPANDED}");
}

#[test]
fn simple_mode_skips_the_full_grammar() {
    let dir = make_temp_dir("simple");
    write_file(&dir.join(".env"), "RAW=$HOME\n");

    let output = run_envfile(&dir, &["run", "--simple", "--", "printenv", "RAW"], None);
    assert_success(&output);
    assert_eq!(stdout_trimmed(&output), "$HOME");
}

#[test]
fn malformed_file_fails_with_diagnostic() {
    let dir = make_temp_dir("malformed");
    write_file(&dir.join(".env"), "OOPS='unterminated\n");

    let output = run_envfile(&dir, &["run", "--", "true"], None);
    assert!(!output.status.success(), "expected failure: {output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unterminated quote"),
        "stderr should mention the parse failure: {stderr}"
    );
}

#[test]
fn missing_command_is_a_usage_error() {
    let dir = make_temp_dir("usage");

    let output = run_envfile(&dir, &["run"], None);
    assert!(!output.status.success(), "expected failure: {output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing command"),
        "stderr should mention the missing command: {stderr}"
    );
}

#[test]
fn version_flag_prints_package_version() {
    let dir = make_temp_dir("version");

    let output = run_envfile(&dir, &["--version"], None);
    assert_success(&output);
    assert_eq!(
        stdout_trimmed(&output),
        format!("envfile {}", env!("CARGO_PKG_VERSION"))
    );
}

fn envfile_bin() -> PathBuf {
    if let Some(path) = std::env::var_os("CARGO_BIN_EXE_envfile") {
        return PathBuf::from(path);
    }
    // Fallback for harnesses that do not export the cargo binary path:
    // the binary sits one level above the test executable's deps directory.
    let mut path = std::env::current_exe().expect("failed to locate test executable");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("envfile");
    path
}

fn run_envfile(dir: &Path, args: &[&str], env_pair: Option<(&str, &str)>) -> Output {
    let mut command = Command::new(envfile_bin());
    command.current_dir(dir).args(args);
    if let Some((key, value)) = env_pair {
        command.env(key, value);
    }
    command.output().expect("failed to spawn envfile binary")
}

fn make_temp_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    path.push(format!("envfile-cli-{name}-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&path).expect("failed to create temp dir");
    path
}

fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("failed to write test file");
}

fn stdout_trimmed(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {:?}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

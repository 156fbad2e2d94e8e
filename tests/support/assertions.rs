//! Test assertion helpers.

use std::process::Output;

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command failed with exit code 1.
pub fn assert_failure(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "Expected exit code 1, stderr: {}",
        stderr(output)
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert stderr contains a string.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        err.contains(expected),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Assert stdout does NOT contain a string.
pub fn assert_stdout_excludes(output: &Output, excluded: &str) {
    let out = stdout(output);
    assert!(
        !out.contains(excluded),
        "stdout should not contain '{}', got: {}",
        excluded,
        out
    );
}

/// Assert a stored value is a single line of padded base64.
pub fn assert_base64_envelope(bytes: &[u8]) {
    assert!(!bytes.is_empty(), "envelope is empty");
    assert!(
        bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')),
        "not base64: {}",
        String::from_utf8_lossy(bytes)
    );
    assert_eq!(bytes.len() % 4, 0, "base64 is not padded");
}

/// Assert a set/get round trip through the binary returns `value`.
pub fn assert_roundtrip(t: &super::Test, args: &[&str], key: &str, value: &str) {
    assert_success(&t.set_with(args, key, value));

    let output = t.get_with(args, key);
    assert_success(&output);
    assert_eq!(stdout(&output), format!("{}\n", value));
}

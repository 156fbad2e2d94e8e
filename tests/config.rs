//! Configuration file and precedence tests.

mod support;

use support::*;

#[test]
fn test_config_file_selects_engine_and_keyrings() {
    let (t, _keys) = Test::with_age("ops");
    assert_success(&t.set("k", "from config"));

    // envelope was written by age, so the pgp engine cannot read it back
    let output = t.get_with(&["--engine", "pgp", "--secret-keyring", "ops.key"], "k");
    assert_failure(&output);

    let output = t.get("k");
    assert_success(&output);
    assert_eq!(stdout(&output), "from config\n");
}

#[test]
fn test_flag_overrides_config_file() {
    let t = Test::with_pgp("alice");
    t.write(".crypt.toml", "engine = \"rot13\"\n");

    let output = t.set("k", "v");
    assert_failure(&output);
    assert_stderr_contains(&output, "rot13");

    assert_success(&t.set_with(&["--engine", "pgp"], "k", "v"));
}

#[test]
fn test_plaintext_from_config_file() {
    let t = Test::new();
    t.write(".crypt.toml", "plaintext = true\n");

    assert_success(&t.set("k", "raw"));
    assert_eq!(t.stored("k"), b"raw");
}

#[test]
fn test_endpoint_from_config_file() {
    let t = Test::new();
    t.write("cfg/crypt.toml", "endpoint = \"vault-dir\"\nplaintext = true\n");

    assert_success(&t.set_with(&["--config", "cfg/crypt.toml"], "k", "v"));
    assert!(t.exists("vault-dir/k"));
}

#[test]
fn test_config_from_env() {
    let t = Test::new();
    t.write("other.toml", "plaintext = true\n");

    let output = t
        .cmd()
        .env("CRYPT_CONFIG", "other.toml")
        .args(["set", "k", "-"])
        .write_stdin("v")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.stored("k"), b"v");
}

#[test]
fn test_missing_explicit_config() {
    let t = Test::new();
    let output = t.get_with(&["--config", "nope.toml"], "k");
    assert_failure(&output);
    assert_stderr_contains(&output, "config file not found");
}

#[test]
fn test_unknown_config_field() {
    let t = Test::new();
    t.write(".crypt.toml", "cipher = \"age\"\n");

    let output = t.get("k");
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

//! Command helper methods for Test.

use std::process::Output;

use assert_cmd::Command;

use super::Test;

/// Environment variables that would leak the caller's setup into a test.
const CRYPT_ENV: &[&str] = &[
    "CRYPT_BACKEND",
    "CRYPT_ENDPOINT",
    "CRYPT_ENCRYPTION_ENGINE",
    "CRYPT_CONFIG",
    "CRYPT_LOG",
    "CRYPT_LOG_FORMAT",
];

impl Test {
    /// A crypt command running in the test directory against the file store.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("crypt").expect("failed to find crypt binary");
        for var in CRYPT_ENV {
            cmd.env_remove(var);
        }
        cmd.env("CRYPT_BACKEND", "file");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// `crypt set [args] KEY -` with `value` on stdin.
    pub fn set_with(&self, args: &[&str], key: &str, value: impl Into<Vec<u8>>) -> Output {
        self.cmd()
            .arg("set")
            .args(args)
            .args([key, "-"])
            .write_stdin(value)
            .output()
            .expect("failed to run crypt set")
    }

    /// `crypt get [args] KEY`.
    pub fn get_with(&self, args: &[&str], key: &str) -> Output {
        self.cmd()
            .arg("get")
            .args(args)
            .arg(key)
            .output()
            .expect("failed to run crypt get")
    }

    /// `crypt list [args] PREFIX`.
    pub fn list_with(&self, args: &[&str], prefix: &str) -> Output {
        self.cmd()
            .arg("list")
            .args(args)
            .arg(prefix)
            .output()
            .expect("failed to run crypt list")
    }

    /// `crypt set` with the default engine and keyrings.
    pub fn set(&self, key: &str, value: &str) -> Output {
        self.set_with(&[], key, value)
    }

    /// `crypt get` with the default engine and keyrings.
    pub fn get(&self, key: &str) -> Output {
        self.get_with(&[], key)
    }

    /// `crypt list` with the default engine and keyrings.
    pub fn list(&self, prefix: &str) -> Output {
        self.list_with(&[], prefix)
    }
}

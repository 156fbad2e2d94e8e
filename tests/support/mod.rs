//! Test support utilities for crypt integration tests.
//!
//! Provides an isolated working directory per test and helpers for running
//! the binary against the file backend.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Test environment with an isolated working directory.
///
/// The binary runs with `.current_dir()` set to the temp dir and the file
/// backend selected, so the default store root `.crypt-store` and the
/// default keyrings resolve inside it. Tests can run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Environment with `name`'s OpenPGP keys at the default keyring paths.
    pub fn with_pgp(name: &str) -> Self {
        let t = Self::new();
        t.install_pgp(name);
        t
    }

    /// Path inside the working directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Root of the file store used by the binary.
    pub fn store_root(&self) -> PathBuf {
        self.path(".crypt-store")
    }

    /// Raw bytes stored for `key`, read straight from the store tree.
    pub fn stored(&self, key: &str) -> Vec<u8> {
        std::fs::read(self.store_root().join(key.trim_start_matches('/')))
            .expect("stored value missing")
    }

    /// Write a file into the working directory.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create dir");
        }
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }

    pub fn exists(&self, rel: impl AsRef<Path>) -> bool {
        self.dir.path().join(rel).exists()
    }
}

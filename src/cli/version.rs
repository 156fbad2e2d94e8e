//! Version command.
//!
//! Build metadata is captured from the environment at compile time, e.g.
//! `CRYPT_COMMIT=$(git rev-parse --short HEAD) cargo build --release`.

use crate::cli::output;

/// Package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Metadata recorded when the binary was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub date: Option<&'static str>,
    pub built_by: Option<&'static str>,
}

impl BuildInfo {
    /// Metadata of the running binary.
    pub fn current() -> Self {
        Self {
            version: VERSION,
            commit: option_env!("CRYPT_COMMIT"),
            date: option_env!("CRYPT_BUILD_DATE"),
            built_by: option_env!("CRYPT_BUILT_BY"),
        }
    }

    /// One-line summary, e.g. `crypt 0.1.0 (3f2a9c1 2026-01-02)`.
    pub fn summary(&self) -> String {
        let details: Vec<&str> = [self.commit, self.date].into_iter().flatten().collect();
        if details.is_empty() {
            format!("crypt {}", self.version)
        } else {
            format!("crypt {} ({})", self.version, details.join(" "))
        }
    }
}

/// Print version and build information.
pub fn execute() {
    let info = BuildInfo::current();
    println!("{}", info.summary());

    if let Some(commit) = info.commit {
        output::kv("commit:  ", commit);
    }
    if let Some(date) = info.date {
        output::kv("built:   ", date);
    }
    if let Some(built_by) = info.built_by {
        output::kv("built by:", built_by);
    }
}

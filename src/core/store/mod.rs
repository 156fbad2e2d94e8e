//! Key/value store abstraction.
//!
//! The secret operations only ever see a `&dyn Store`. Backends live in their
//! own files; the remote ones are behind cargo features.
//!
//! ## Adding a New Store Backend
//!
//! 1. Implement the `Store` trait in a new file (e.g., `redis.rs`)
//! 2. Add a variant to `Backend` and wire it up in [`open`]
//! 3. Gate it behind a cargo feature if it pulls in new dependencies

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::core::constants::{CONSUL_ENDPOINT, ETCD_ENDPOINT, FILE_STORE_ROOT};
use crate::core::types::KvPairs;
use crate::error::{ConfigError, Result, StoreResult};

#[cfg(feature = "consul")]
mod consul;
#[cfg(feature = "etcd")]
mod etcd;
mod fs;
mod memory;

#[cfg(feature = "consul")]
pub use consul::Consul;
#[cfg(feature = "etcd")]
pub use etcd::Etcd;
pub use fs::Filesystem;
pub use memory::Memory;

/// Key/value store trait.
///
/// Single-key writes must be atomic: a failed `set` leaves the previous
/// value in place.
pub trait Store {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Every pair whose key starts with `prefix`, in backend order.
    ///
    /// An empty result is not an error.
    fn list(&self, prefix: &str) -> StoreResult<KvPairs>;
}

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Etcd,
    Consul,
    File,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Self::Etcd => "etcd",
            Self::Consul => "consul",
            Self::File => "file",
        }
    }

    /// Endpoint used when none is configured.
    ///
    /// For the `file` backend this is the store's root directory.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::Etcd => ETCD_ENDPOINT,
            Self::Consul => CONSUL_ENDPOINT,
            Self::File => FILE_STORE_ROOT,
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "etcd" => Ok(Self::Etcd),
            "consul" => Ok(Self::Consul),
            "file" => Ok(Self::File),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Connect to a store backend.
///
/// # Errors
///
/// Returns `ConfigError::BackendNotCompiled` when the backend's cargo feature
/// is disabled, or a `StoreError` if the client cannot be built.
pub fn open(backend: Backend, endpoint: Option<&str>) -> Result<Box<dyn Store>> {
    let endpoint = endpoint.unwrap_or_else(|| backend.default_endpoint());
    debug!(backend = backend.name(), endpoint, "opening store");

    match backend {
        Backend::File => Ok(Box::new(Filesystem::new(endpoint))),
        #[cfg(feature = "etcd")]
        Backend::Etcd => Ok(Box::new(Etcd::new(endpoint)?)),
        #[cfg(not(feature = "etcd"))]
        Backend::Etcd => Err(ConfigError::BackendNotCompiled { backend: "etcd" }.into()),
        #[cfg(feature = "consul")]
        Backend::Consul => Ok(Box::new(Consul::new(endpoint)?)),
        #[cfg(not(feature = "consul"))]
        Backend::Consul => Err(ConfigError::BackendNotCompiled { backend: "consul" }.into()),
    }
}

/// Turn a configured endpoint into a base URL.
///
/// Bare `host:port` endpoints get an `http://` scheme; trailing slashes are
/// dropped.
#[cfg(any(feature = "etcd", feature = "consul"))]
fn base_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}

/// HTTP client shared by the remote backends.
#[cfg(any(feature = "etcd", feature = "consul"))]
fn http_client() -> StoreResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(crate::core::constants::HTTP_TIMEOUT)
        .build()
        .map_err(|e| crate::error::StoreError::Unavailable(format!("http client: {e}")))
}

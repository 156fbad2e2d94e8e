//! Error types.
//!
//! One enum per concern, folded into [`Error`] through `#[from]` conversions.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by every crypt operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A single entry of a list operation could not be decoded.
    #[error("failed to decode '{key}': {source}")]
    Entry {
        key: String,
        #[source]
        source: CipherError,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration and selection errors.
///
/// These are raised before the store is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown encryption engine: {0} (supported: pgp, age)")]
    UnknownEngine(String),

    #[error("unknown backend: {0} (supported: etcd, consul, file)")]
    UnknownBackend(String),

    #[error("{backend} backend not compiled. Rebuild with: cargo install crypt --features {backend}")]
    BackendNotCompiled { backend: &'static str },

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Envelope encode/decode failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("invalid key material: {0}")]
    KeyMaterialInvalid(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),
}

/// Key/value backend failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("backend request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    #[error("unexpected backend response: {0}")]
    Response(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Result of a cipher engine operation.
pub type CipherResult<T> = std::result::Result<T, CipherError>;

/// Result of a store operation.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

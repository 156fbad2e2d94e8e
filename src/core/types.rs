//! Type aliases and small value types shared across the core.

use serde::Serialize;

/// A key in the backing store (e.g., `app/db/password`).
pub type Key = String;

/// An encrypted, base64-encoded envelope as stored in the backend.
pub type Envelope = Vec<u8>;

/// A key and its raw value, as returned by a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvPair {
    pub key: Key,
    pub value: Vec<u8>,
}

impl KvPair {
    pub fn new(key: impl Into<Key>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Pairs returned by a list operation, in backend order.
pub type KvPairs = Vec<KvPair>;

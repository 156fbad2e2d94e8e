//! Secret operations (get, list, set).
//!
//! Composes a [`Store`] with an optional [`Codec`]. With a codec, values are
//! encoded on the way in and decoded on the way out; without one they pass
//! through byte-for-byte.
//!
//! Each call is one transaction: the keyring is opened once, used, and closed
//! when the call returns. Nothing is retried and no partial results escape.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::cipher::Engine;
use crate::core::keyring::Keyring;
use crate::core::store::Store;
use crate::core::types::{KvPair, KvPairs};
use crate::error::{Error, Result};

/// Engine and key file for an encrypted operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    pub engine: Engine,
    /// Public keyring for `set`, secret keyring for `get` and `list`
    pub keyring: PathBuf,
}

impl Codec {
    pub fn new(engine: Engine, keyring: impl AsRef<Path>) -> Self {
        Self {
            engine,
            keyring: keyring.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<Keyring> {
        Ok(Keyring::open(&self.keyring)?)
    }
}

/// Fetch and decode the value stored under `key`.
///
/// # Errors
///
/// Fails if the keyring cannot be opened, the key is missing, or the value
/// does not decode with this codec.
pub fn get(store: &dyn Store, key: &str, codec: Option<&Codec>) -> Result<Vec<u8>> {
    debug!(key, encrypted = codec.is_some(), "get");

    let Some(codec) = codec else {
        return Ok(store.get(key)?);
    };

    let mut keyring = codec.open()?;
    let envelope = store.get(key)?;
    let plaintext = codec.engine.cipher().decode(&envelope, &mut keyring)?;

    debug!(key, bytes = plaintext.len(), "value decoded");
    Ok(plaintext)
}

/// Fetch every pair under `prefix`, decoding each value.
///
/// The keyring is opened once and rewound before every decode.
///
/// # Errors
///
/// The first entry that fails to decode aborts the call with
/// [`Error::Entry`] naming its key.
pub fn list(store: &dyn Store, prefix: &str, codec: Option<&Codec>) -> Result<KvPairs> {
    debug!(prefix, encrypted = codec.is_some(), "list");

    let Some(codec) = codec else {
        return Ok(store.list(prefix)?);
    };

    let mut keyring = codec.open()?;
    let cipher = codec.engine.cipher();
    let pairs = store.list(prefix)?;
    debug!(prefix, count = pairs.len(), "decoding entries");

    pairs
        .into_iter()
        .map(|pair| {
            let value = keyring
                .rewind()
                .and_then(|()| cipher.decode(&pair.value, &mut keyring))
                .map_err(|source| Error::Entry {
                    key: pair.key.clone(),
                    source,
                })?;
            Ok(KvPair::new(pair.key, value))
        })
        .collect()
}

/// Encode `data` and store it under `key`.
///
/// Encoding happens before the store is touched, so a keyring or cipher
/// failure never changes the stored value.
pub fn set(store: &dyn Store, key: &str, data: &[u8], codec: Option<&Codec>) -> Result<()> {
    debug!(key, bytes = data.len(), encrypted = codec.is_some(), "set");

    let Some(codec) = codec else {
        store.set(key, data)?;
        return Ok(());
    };

    let mut keyring = codec.open()?;
    let envelope = codec.engine.cipher().encode(data, &mut keyring)?;
    drop(keyring);

    store.set(key, &envelope)?;
    debug!(key, bytes = envelope.len(), "envelope stored");
    Ok(())
}

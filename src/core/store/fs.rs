//! Filesystem-backed store.
//!
//! Each key maps to a file under the store root: `app/db/password` is stored
//! at `<root>/app/db/password`. Values are written to a temp file in the
//! target directory and renamed into place, so a failed write never leaves a
//! truncated value behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::Store;
use crate::core::types::{KvPair, KvPairs};
use crate::error::{StoreError, StoreResult};

/// Prefix of in-flight temp files. Never reported by `list`.
const TEMP_PREFIX: &str = ".crypt-";

/// Directory tree store.
#[derive(Debug, Clone)]
pub struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its file path.
    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let segments = key_segments(key)?;
        Ok(segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    /// Collect every value file under `dir`, keyed relative to the root.
    fn walk(&self, dir: &Path, key_prefix: &str, out: &mut KvPairs) -> StoreResult<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let entry = entry?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    debug!(name = ?name, "skipping non-utf8 entry");
                    continue;
                }
            };
            if name.starts_with(TEMP_PREFIX) {
                continue;
            }

            let key = format!("{}{}", key_prefix, name);
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                self.walk(&entry.path(), &format!("{}/", key), out)?;
            } else if file_type.is_file() {
                out.push(KvPair::new(key, fs::read(entry.path())?));
            }
        }

        Ok(())
    }
}

impl Store for Filesystem {
    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.path_for(key)?;
        trace!(path = %path.display(), "reading value");

        if path.is_dir() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(key.to_string()),
            _ => StoreError::Io(e),
        })
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(dir)?;
        temp.write_all(value)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(key, bytes = value.len(), "value written");
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<KvPairs> {
        let prefix = prefix.trim_start_matches('/');
        let mut pairs = Vec::new();
        self.walk(&self.root, "", &mut pairs)?;

        pairs.retain(|pair| pair.key.starts_with(prefix));
        pairs.sort_by(|a, b| a.key.cmp(&b.key));
        trace!(prefix, count = pairs.len(), "listed values");
        Ok(pairs)
    }
}

/// Split a key into path segments, rejecting anything that could escape the
/// store root.
fn key_segments(key: &str) -> StoreResult<Vec<&str>> {
    let invalid = |reason: &str| StoreError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = key.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("key is empty"));
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    for segment in &segments {
        match *segment {
            "" => return Err(invalid("empty path segment")),
            "." | ".." => return Err(invalid("relative path segment")),
            s if s.contains('\\') => return Err(invalid("backslash in key")),
            s if s.starts_with(TEMP_PREFIX) => return Err(invalid("reserved name")),
            _ => {}
        }
    }

    Ok(segments)
}

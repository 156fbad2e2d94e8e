//! Key material handles.
//!
//! A `Keyring` is an opened key file (public keyring, recipient file, secret
//! keyring or identity file) owned by one operation. The file is closed when
//! the handle is dropped, on success and error paths alike.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{CipherError, CipherResult};

/// An opened, rewindable key file.
#[derive(Debug)]
pub struct Keyring {
    path: PathBuf,
    file: File,
}

impl Keyring {
    /// Open a key file for reading.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::KeyMaterialInvalid` if the path is missing,
    /// unreadable or not a regular file.
    pub fn open(path: impl AsRef<Path>) -> CipherResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening keyring");

        let invalid = |e: io::Error| {
            CipherError::KeyMaterialInvalid(format!("cannot open {}: {}", path.display(), e))
        };

        let file = File::open(path).map_err(invalid)?;
        if !file.metadata().map_err(invalid)?.is_file() {
            return Err(CipherError::KeyMaterialInvalid(format!(
                "{} is not a file",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path the keyring was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seek back to the start so the key material can be parsed again.
    pub fn rewind(&mut self) -> CipherResult<()> {
        self.file.seek(SeekFrom::Start(0)).map_err(|e| {
            CipherError::KeyMaterialInvalid(format!("cannot rewind {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

impl Read for Keyring {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Drop for Keyring {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "keyring closed");
    }
}

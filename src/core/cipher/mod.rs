//! Cryptographic operations.
//!
//! Provides the envelope codec abstraction and its engines. Every engine
//! produces the same envelope shape:
//!
//! ```text
//! base64( engine_ciphertext( gzip( plaintext ) ) )
//! ```
//!
//! The envelope carries no engine identifier, so the engine used to decode a
//! value must be the one that encoded it.
//!
//! ## Engines
//!
//! - **pgp**: Default. Armored OpenPGP keyrings for recipients and identities.
//! - **age**: age recipient files and identity files (x25519).
//!
//! ## Adding a New Engine
//!
//! 1. Implement the `Cipher` trait in a new file
//! 2. Add a variant to `Engine` and map it in `Engine::cipher`
//! 3. Re-export from this module

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::Envelope;
use crate::error::{CipherResult, ConfigError};

mod age;
mod envelope;
mod pgp;

pub use self::age::{parse_recipients, Age};
pub use self::pgp::Pgp;

/// Envelope codec trait.
///
/// Key material is passed as an opened stream in the engine's own format:
/// a public keyring or recipient file for `encode`, a secret keyring or
/// identity file for `decode`. Engines read the stream from its current
/// position and parse it before doing any cryptographic work.
pub trait Cipher {
    /// Compress, encrypt for every recipient in `recipients`, then base64.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::KeyMaterialInvalid`, `EncryptionFailed` or
    /// `CompressionFailed`. The first error aborts the encode.
    fn encode(&self, plaintext: &[u8], recipients: &mut dyn Read) -> CipherResult<Envelope>;

    /// Base64-decode, decrypt with any matching identity, then decompress.
    ///
    /// Messages are never signature-checked.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::KeyMaterialInvalid`, `MalformedEnvelope`,
    /// `DecryptionFailed` or `DecompressionFailed`.
    fn decode(&self, envelope: &[u8], identities: &mut dyn Read) -> CipherResult<Vec<u8>>;

    /// Engine name for display/config.
    fn name(&self) -> &'static str;
}

/// Engine selection.
///
/// Part of each request; never stored with the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Pgp,
    Age,
}

impl Engine {
    /// All engines, in the order they are advertised.
    pub const ALL: [Engine; 2] = [Engine::Pgp, Engine::Age];

    /// The codec implementing this engine.
    pub fn cipher(self) -> &'static dyn Cipher {
        match self {
            Self::Pgp => &Pgp,
            Self::Age => &Age,
        }
    }

    pub fn name(self) -> &'static str {
        self.cipher().name()
    }
}

impl FromStr for Engine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pgp" => Ok(Self::Pgp),
            "age" => Ok(Self::Age),
            other => Err(ConfigError::UnknownEngine(other.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Configuration file management.
//!
//! Handles reading `.crypt.toml` and merging command-line overrides into a
//! single [`Config`] that every operation is driven from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cipher::Engine;
use crate::core::constants;
use crate::core::secrets::Codec;
use crate::core::store::{self, Backend, Store};
use crate::error::{ConfigError, Result};

/// Settings shared by every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Store backend name: "etcd" (default), "consul" or "file"
    pub backend: String,
    /// Backend endpoint; the backend's default when unset
    pub endpoint: Option<String>,
    /// Encryption engine name: "pgp" (default) or "age"
    pub engine: String,
    /// Public keyring or recipient file used by `set`
    pub keyring: PathBuf,
    /// Secret keyring or identity file used by `get` and `list`
    pub secret_keyring: PathBuf,
    /// Store and read values without encryption
    pub plaintext: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: constants::DEFAULT_BACKEND.to_string(),
            endpoint: None,
            engine: constants::DEFAULT_ENGINE.to_string(),
            keyring: PathBuf::from(constants::DEFAULT_KEYRING),
            secret_keyring: PathBuf::from(constants::DEFAULT_SECRET_KEYRING),
            plaintext: false,
        }
    }
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub endpoint: Option<String>,
    pub engine: Option<String>,
    pub plaintext: bool,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `.crypt.toml` in the
    /// working directory is used when present, else the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing explicit path,
    /// `ConfigError::ReadFile` or `ConfigError::Parse` otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into())
            }
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(constants::CONFIG_FILE);
                if !default.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(
            backend = %config.backend,
            engine = %config.engine,
            plaintext = config.plaintext,
            "config loaded"
        );
        Ok(config)
    }

    /// Merge command-line overrides into this config.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(engine) = overrides.engine {
            self.engine = engine;
        }
        self.plaintext |= overrides.plaintext;
        self
    }

    /// The configured store backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackend` for an unsupported name.
    pub fn backend(&self) -> Result<Backend> {
        Ok(self.backend.parse::<Backend>()?)
    }

    /// The configured encryption engine.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownEngine` for an unsupported name.
    pub fn engine(&self) -> Result<Engine> {
        Ok(self.engine.parse::<Engine>()?)
    }

    /// Codec for an operation using `keyring`, or `None` in plaintext mode.
    ///
    /// Plaintext mode ignores the engine entirely, so an unknown engine name
    /// is only an error when encryption is on.
    pub fn codec(&self, keyring: &Path) -> Result<Option<Codec>> {
        if self.plaintext {
            return Ok(None);
        }
        Ok(Some(Codec::new(self.engine()?, keyring)))
    }

    /// Connect to the configured store.
    pub fn open_store(&self) -> Result<Box<dyn Store>> {
        store::open(self.backend()?, self.endpoint.as_deref())
    }
}

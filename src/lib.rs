//! crypt - encrypted configuration values in distributed key/value stores.
//!
//! Values are written as self-contained envelopes,
//! `base64(cipher(gzip(data)))`, so the store never sees plaintext and needs
//! no knowledge of the encryption in use.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── secrets       # get / list / set
//! │   ├── version       # Build information
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # Envelope codec
//!     │   ├── mod       # Cipher trait, Engine selection
//!     │   ├── envelope  # gzip and base64 layers
//!     │   ├── pgp       # OpenPGP keyrings
//!     │   └── age       # age recipients and identities
//!     ├── config        # .crypt.toml and overrides
//!     ├── keyring       # Opened key material
//!     ├── secrets       # get / list / set orchestration
//!     └── store/        # Key/value backends
//!         ├── mod       # Store trait, Backend selection
//!         ├── fs        # Directory tree
//!         ├── memory    # In-process
//!         ├── etcd      # etcd v3 gateway (feature "etcd")
//!         └── consul    # Consul KV (feature "consul")
//! ```
//!
//! # Example
//!
//! ```no_run
//! use crypt::core::cipher::Engine;
//! use crypt::core::secrets::{self, Codec};
//! use crypt::core::store::Filesystem;
//!
//! # fn main() -> crypt::error::Result<()> {
//! let store = Filesystem::new(".crypt-store");
//! let public = Codec::new(Engine::Age, "recipients.txt");
//! let secret = Codec::new(Engine::Age, "identity.txt");
//!
//! secrets::set(&store, "db/password", b"s3cr3t", Some(&public))?;
//! let value = secrets::get(&store, "db/password", Some(&secret))?;
//! assert_eq!(value, b"s3cr3t");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;

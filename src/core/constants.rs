//! Constants used throughout crypt.
//!
//! Centralizes file names, defaults and environment variable names.

/// Configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = ".crypt.toml";

/// Default public keyring used by `set`.
pub const DEFAULT_KEYRING: &str = ".pubring.gpg";

/// Default secret keyring used by `get` and `list`.
pub const DEFAULT_SECRET_KEYRING: &str = ".secring.gpg";

/// Default backend name.
pub const DEFAULT_BACKEND: &str = "etcd";

/// Default encryption engine name.
pub const DEFAULT_ENGINE: &str = "pgp";

/// Default etcd v3 gateway endpoint.
pub const ETCD_ENDPOINT: &str = "http://127.0.0.1:2379";

/// Default consul agent endpoint.
pub const CONSUL_ENDPOINT: &str = "127.0.0.1:8500";

/// Default root directory of the file backend.
pub const FILE_STORE_ROOT: &str = ".crypt-store";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "CRYPT_LOG";

/// Environment variable selecting the log format (`json` or unset).
pub const LOG_FORMAT_ENV: &str = "CRYPT_LOG_FORMAT";

/// Request timeout for the HTTP store clients.
pub const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

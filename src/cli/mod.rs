//! Command-line interface.

pub mod completions;
pub mod output;
pub mod secrets;
pub mod version;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::{Config, Overrides};
use crate::error::Result;

/// crypt - Store and retrieve encrypted configs from etcd or consul.
#[derive(Parser)]
#[command(
    name = "crypt",
    about = "Store and retrieve encrypted configs from etcd or consul",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend to use: etcd, consul or file
    #[arg(long, global = true, env = "CRYPT_BACKEND")]
    pub backend: Option<String>,

    /// Backend endpoint (a directory for the file backend)
    #[arg(long, global = true, env = "CRYPT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Encryption engine: pgp or age
    #[arg(
        long = "encryption-engine",
        visible_alias = "engine",
        global = true,
        env = "CRYPT_ENCRYPTION_ENGINE"
    )]
    pub engine: Option<String>,

    /// Don't encrypt or decrypt values
    #[arg(long, global = true)]
    pub plaintext: bool,

    /// Config file (defaults to .crypt.toml when present)
    #[arg(long, global = true, env = "CRYPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Retrieve the value of a key
    Get {
        /// Secret keyring or age identity file
        #[arg(long)]
        secret_keyring: Option<PathBuf>,
        /// Key to read (e.g., /app/config)
        key: String,
    },

    /// Retrieve all values under a key prefix
    List {
        /// Secret keyring or age identity file
        #[arg(long)]
        secret_keyring: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Key prefix (e.g., /app/)
        prefix: String,
    },

    /// Set the value of a key from a file
    Set {
        /// Public keyring or age recipients file
        #[arg(long)]
        keyring: Option<PathBuf>,
        /// Key to write
        key: String,
        /// File holding the value, or - for stdin
        file: PathBuf,
    },

    /// Print version and build information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            backend: self.backend.clone(),
            endpoint: self.endpoint.clone(),
            engine: self.engine.clone(),
            plaintext: self.plaintext,
        }
    }
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns the first error raised by configuration, the store or the codec.
pub fn execute(cli: Cli) -> Result<()> {
    let load = |cli: &Cli| -> Result<Config> {
        Ok(Config::load(cli.config.as_deref())?.apply(cli.overrides()))
    };

    match &cli.command {
        Command::Version => {
            version::execute();
            Ok(())
        }
        Command::Completions { shell } => completions::execute(*shell),
        Command::Get {
            secret_keyring,
            key,
        } => secrets::get(&load(&cli)?, key, secret_keyring.as_deref()),
        Command::List {
            secret_keyring,
            json,
            prefix,
        } => secrets::list(&load(&cli)?, prefix, secret_keyring.as_deref(), *json),
        Command::Set { keyring, key, file } => {
            secrets::set(&load(&cli)?, key, file, keyring.as_deref())
        }
    }
}

//! crypt - Store and retrieve encrypted configs from etcd or consul.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crypt::cli::output;
use crypt::cli::{execute, Cli};
use crypt::core::constants::{LOG_ENV, LOG_FORMAT_ENV};
use crypt::error::{CipherError, ConfigError, Error, StoreError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("crypt=debug")
        } else {
            EnvFilter::new("crypt=warn")
        }
    });

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = hint(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// Suggestion printed under an error, if one applies.
fn hint(error: &Error) -> Option<&'static str> {
    match error {
        Error::Config(ConfigError::UnknownEngine(_)) => Some("use --encryption-engine pgp or age"),
        Error::Config(ConfigError::UnknownBackend(_)) => {
            Some("use --backend etcd, consul or file")
        }
        Error::Cipher(CipherError::KeyMaterialInvalid(_)) => {
            Some("check --keyring / --secret-keyring match the selected engine")
        }
        Error::Cipher(CipherError::DecryptionFailed(_)) | Error::Entry { .. } => {
            Some("was the value written with a different engine or key?")
        }
        Error::Store(StoreError::Request { .. }) => Some("is the backend reachable at --endpoint?"),
        _ => None,
    }
}

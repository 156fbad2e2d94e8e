//! Secret commands: get, list, set.
//!
//! Values are written to stdout as raw bytes so they can be piped; status
//! messages go to stderr.

use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::secrets;
use crate::error::Result;

/// JSON shape of one listed entry.
#[derive(Serialize)]
struct Entry<'a> {
    key: &'a str,
    value: String,
}

/// Print the value of `key`.
pub fn get(config: &Config, key: &str, secret_keyring: Option<&Path>) -> Result<()> {
    let keyring = secret_keyring.unwrap_or(config.secret_keyring.as_path());
    let codec = config.codec(keyring)?;
    let store = config.open_store()?;

    let value = Zeroizing::new(secrets::get(store.as_ref(), key, codec.as_ref())?);

    let mut stdout = io::stdout().lock();
    stdout.write_all(&value)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

/// Print every entry under `prefix`, one `key: value` line each.
pub fn list(config: &Config, prefix: &str, secret_keyring: Option<&Path>, json: bool) -> Result<()> {
    let keyring = secret_keyring.unwrap_or(config.secret_keyring.as_path());
    let codec = config.codec(keyring)?;
    let store = config.open_store()?;

    let pairs = secrets::list(store.as_ref(), prefix, codec.as_ref())?;
    info!(prefix, count = pairs.len(), "listed");

    let mut stdout = io::stdout().lock();
    if json {
        let entries: Vec<Entry<'_>> = pairs
            .iter()
            .map(|pair| Entry {
                key: &pair.key,
                value: String::from_utf8_lossy(&pair.value).into_owned(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut stdout, &entries)?;
        stdout.write_all(b"\n")?;
    } else {
        for pair in &pairs {
            write!(stdout, "{}: ", pair.key)?;
            stdout.write_all(&pair.value)?;
            stdout.write_all(b"\n")?;
        }
    }
    stdout.flush()?;
    Ok(())
}

/// Store the contents of `file` (or stdin for `-`) under `key`.
pub fn set(config: &Config, key: &str, file: &Path, keyring: Option<&Path>) -> Result<()> {
    let keyring = keyring.unwrap_or(config.keyring.as_path());
    let codec = config.codec(keyring)?;
    let data = read_input(file)?;

    if data.is_empty() {
        output::warn(&format!("storing empty value for {}", output::key(key)));
    }

    let store = config.open_store()?;
    secrets::set(store.as_ref(), key, &data, codec.as_ref())?;

    output::success(&format!("set {}", output::key(key)));
    Ok(())
}

/// Read a value from a file, or stdin for `-`. Wiped on drop.
fn read_input(source: &Path) -> Result<Zeroizing<Vec<u8>>> {
    let mut data = Zeroizing::new(Vec::new());
    if source == Path::new("-") {
        io::stdin().lock().read_to_end(&mut data)?;
    } else {
        std::fs::File::open(source)?.read_to_end(&mut data)?;
    }
    Ok(data)
}

//! Age engine implementation.
//!
//! Recipients come from an age recipient file (one `age1...` key per line,
//! `#` comments allowed). Identities come from a standard age identity file.

use std::io::{BufRead, BufReader, Read};

use ::age::x25519;
use tracing::trace;
use zeroize::Zeroizing;

use super::{envelope, Cipher};
use crate::core::types::Envelope;
use crate::error::{CipherError, CipherResult};

/// Age-based envelope engine using x25519 keys
pub struct Age;

impl Cipher for Age {
    fn name(&self) -> &'static str {
        "age"
    }

    fn encode(&self, plaintext: &[u8], recipients: &mut dyn Read) -> CipherResult<Envelope> {
        let recipients = parse_recipients(recipients)?;
        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encoding"
        );

        let encryptor =
            age::Encryptor::with_recipients(recipients.iter().map(|r| r as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        // gzip -> age, both finished before the base64 layer is applied
        let writer = encryptor
            .wrap_output(Vec::new())
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        let writer = envelope::compress(writer, plaintext)?;
        let ciphertext = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        let encoded = envelope::encode_base64(&ciphertext);

        trace!(envelope_len = encoded.len(), "encoded");
        Ok(encoded)
    }

    fn decode(&self, envelope: &[u8], identities: &mut dyn Read) -> CipherResult<Vec<u8>> {
        let identities = parse_identities(identities)?;
        trace!(
            identities = identities.len(),
            envelope_len = envelope.len(),
            "decoding"
        );

        let ciphertext = envelope::decode_base64(envelope)?;
        let decryptor = age::Decryptor::new(&ciphertext[..]).map_err(|e| match e {
            age::DecryptError::InvalidHeader
            | age::DecryptError::UnknownFormat
            | age::DecryptError::Io(_) => CipherError::MalformedEnvelope(format!("{}", e)),
            other => CipherError::DecryptionFailed(format!("{}", other)),
        })?;

        let mut reader = decryptor
            .decrypt(identities.iter().map(|i| i.as_ref() as &dyn age::Identity))
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        let mut compressed = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut compressed)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        let plaintext = envelope::decompress(&compressed[..])?;
        trace!(plaintext_len = plaintext.len(), "decoded");
        Ok(plaintext)
    }
}

/// Parse an age recipient file into x25519 recipients.
///
/// Blank lines and `#` comments are skipped. At least one recipient is
/// required.
///
/// # Errors
///
/// Returns `CipherError::KeyMaterialInvalid` naming the offending line.
pub fn parse_recipients(reader: &mut dyn Read) -> CipherResult<Vec<x25519::Recipient>> {
    let mut recipients = Vec::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| {
            CipherError::KeyMaterialInvalid(format!("failed to read recipients: {}", e))
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let recipient = line.parse::<x25519::Recipient>().map_err(|e| {
            CipherError::KeyMaterialInvalid(format!(
                "invalid recipient on line {}: {}",
                index + 1,
                e
            ))
        })?;
        recipients.push(recipient);
    }

    if recipients.is_empty() {
        return Err(CipherError::KeyMaterialInvalid(
            "no recipients found".to_string(),
        ));
    }

    Ok(recipients)
}

/// Parse an age identity file.
fn parse_identities(reader: &mut dyn Read) -> CipherResult<Vec<Box<dyn age::Identity>>> {
    let identity_file = age::IdentityFile::from_buffer(BufReader::new(reader)).map_err(|e| {
        CipherError::KeyMaterialInvalid(format!("failed to read identity file: {}", e))
    })?;

    let identities = identity_file
        .into_identities()
        .map_err(|e| CipherError::KeyMaterialInvalid(format!("{}", e)))?;

    if identities.is_empty() {
        return Err(CipherError::KeyMaterialInvalid(
            "no identities found".to_string(),
        ));
    }

    Ok(identities)
}

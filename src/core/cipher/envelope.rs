//! Envelope framing shared by every engine.
//!
//! Handles the two engine-independent layers of the wire format: gzip
//! (default level) around the plaintext and standard padded base64 around
//! the ciphertext.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{CipherError, CipherResult};

/// Apply the outermost base64 layer to a finished ciphertext.
pub(crate) fn encode_base64(ciphertext: &[u8]) -> Vec<u8> {
    STANDARD.encode(ciphertext).into_bytes()
}

/// Gzip `plaintext` into `writer` and hand the writer back once the gzip
/// trailer has been written.
pub(crate) fn compress<W: Write>(writer: W, plaintext: &[u8]) -> CipherResult<W> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    encoder
        .write_all(plaintext)
        .map_err(|e| CipherError::CompressionFailed(format!("{}", e)))?;
    encoder
        .finish()
        .map_err(|e| CipherError::CompressionFailed(format!("{}", e)))
}

/// Strip the base64 layer.
///
/// ASCII whitespace is ignored so values stored with a trailing newline
/// still decode.
pub(crate) fn decode_base64(envelope: &[u8]) -> CipherResult<Vec<u8>> {
    let compact: Vec<u8> = envelope
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if compact.is_empty() {
        return Err(CipherError::MalformedEnvelope("envelope is empty".to_string()));
    }

    STANDARD
        .decode(&compact)
        .map_err(|e| CipherError::MalformedEnvelope(format!("invalid base64: {}", e)))
}

/// Gunzip a decrypted payload.
pub(crate) fn decompress<R: Read>(reader: R) -> CipherResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(reader);
    let mut plaintext = Vec::new();
    decoder
        .read_to_end(&mut plaintext)
        .map_err(|e| CipherError::DecompressionFailed(format!("{}", e)))?;
    Ok(plaintext)
}

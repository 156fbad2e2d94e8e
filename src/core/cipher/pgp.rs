//! OpenPGP engine implementation.
//!
//! Recipients and identities are OpenPGP keyrings, armored or binary.
//! Messages are encrypted to every encryption-capable subkey in the public
//! keyring and are never signed.
//!
//! The envelope's own gzip layer is applied before encryption, so the
//! literal data packet carries already-compressed bytes.

use std::io::Read;

use pgp::composed::{Deserializable, Message, SignedPublicKey, SignedPublicSubKey, SignedSecretKey};
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::ser::Serialize;
use tracing::trace;
use zeroize::Zeroizing;

use super::{envelope, Cipher};
use crate::core::types::Envelope;
use crate::error::{CipherError, CipherResult};

/// Symmetric cipher for the encrypted data packet.
const SESSION_CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

const ARMOR_HEADER: &[u8] = b"-----BEGIN PGP";

/// OpenPGP envelope engine using armored keyrings
pub struct Pgp;

impl Cipher for Pgp {
    fn name(&self) -> &'static str {
        "pgp"
    }

    fn encode(&self, plaintext: &[u8], recipients: &mut dyn Read) -> CipherResult<Envelope> {
        let keys = read_public_keyring(recipients)?;
        let subkeys = encryption_subkeys(&keys)?;
        trace!(
            keys = keys.len(),
            subkeys = subkeys.len(),
            plaintext_len = plaintext.len(),
            "encoding"
        );

        let compressed = Zeroizing::new(envelope::compress(Vec::new(), plaintext)?);
        let message = Message::new_literal_bytes("", &compressed[..]);

        let mut rng = rand::thread_rng();
        let encrypted = message
            .encrypt_to_keys_seipdv1(&mut rng, SESSION_CIPHER, &subkeys[..])
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let ciphertext = encrypted
            .to_bytes()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        let encoded = envelope::encode_base64(&ciphertext);

        trace!(envelope_len = encoded.len(), "encoded");
        Ok(encoded)
    }

    fn decode(&self, envelope: &[u8], identities: &mut dyn Read) -> CipherResult<Vec<u8>> {
        let keys = read_secret_keyring(identities)?;
        trace!(keys = keys.len(), envelope_len = envelope.len(), "decoding");

        let ciphertext = envelope::decode_base64(envelope)?;
        let message = Message::from_bytes(&ciphertext[..])
            .map_err(|e| CipherError::MalformedEnvelope(format!("{}", e)))?;

        let key_refs: Vec<&SignedSecretKey> = keys.iter().collect();
        let (decrypted, _key_ids) = message
            .decrypt(|| String::new(), &key_refs)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        let compressed = decrypted
            .get_content()
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?
            .map(Zeroizing::new)
            .ok_or_else(|| {
                CipherError::MalformedEnvelope("message has no literal data".to_string())
            })?;

        let plaintext = envelope::decompress(&compressed[..])?;
        trace!(plaintext_len = plaintext.len(), "decoded");
        Ok(plaintext)
    }
}

/// Read every transferable public key from a keyring.
fn read_public_keyring(reader: &mut dyn Read) -> CipherResult<Vec<SignedPublicKey>> {
    let keys: Vec<SignedPublicKey> = read_keys(reader, "public")?;
    for key in &keys {
        key.verify().map_err(|e| {
            CipherError::KeyMaterialInvalid(format!("public key self-signature: {}", e))
        })?;
    }
    Ok(keys)
}

/// Read every transferable secret key from a keyring.
fn read_secret_keyring(reader: &mut dyn Read) -> CipherResult<Vec<SignedSecretKey>> {
    let keys: Vec<SignedSecretKey> = read_keys(reader, "secret")?;
    for key in &keys {
        key.verify().map_err(|e| {
            CipherError::KeyMaterialInvalid(format!("secret key self-signature: {}", e))
        })?;
    }
    Ok(keys)
}

/// Parse a keyring in either ASCII-armored or binary form.
fn read_keys<T: Deserializable>(reader: &mut dyn Read, kind: &str) -> CipherResult<Vec<T>> {
    let mut raw = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut raw).map_err(|e| {
        CipherError::KeyMaterialInvalid(format!("failed to read {} keyring: {}", kind, e))
    })?;

    let start = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let parsed = if raw[start..].starts_with(ARMOR_HEADER) {
        T::from_armor_many(&raw[..])
            .map(|(keys, _headers)| keys)
            .map_err(|e| {
                CipherError::KeyMaterialInvalid(format!("invalid {} keyring: {}", kind, e))
            })?
    } else {
        T::from_bytes_many(&raw[..])
    };

    let keys = parsed
        .map(|key| {
            key.map_err(|e| CipherError::KeyMaterialInvalid(format!("invalid {} key: {}", kind, e)))
        })
        .collect::<CipherResult<Vec<_>>>()?;

    if keys.is_empty() {
        return Err(CipherError::KeyMaterialInvalid(format!(
            "{} keyring contains no keys",
            kind
        )));
    }

    Ok(keys)
}

/// Subkeys whose binding signature allows encryption.
///
/// Every key in the keyring must contribute at least one, otherwise the
/// holder of that key could never read the envelope.
fn encryption_subkeys(keys: &[SignedPublicKey]) -> CipherResult<Vec<&SignedPublicSubKey>> {
    let mut subkeys = Vec::new();

    for (index, key) in keys.iter().enumerate() {
        let before = subkeys.len();
        subkeys.extend(key.public_subkeys.iter().filter(|subkey| {
            subkey.signatures.iter().any(|sig| {
                let flags = sig.key_flags();
                flags.encrypt_comms() || flags.encrypt_storage()
            })
        }));

        if subkeys.len() == before {
            return Err(CipherError::KeyMaterialInvalid(format!(
                "key #{} in public keyring has no encryption subkey",
                index + 1
            )));
        }
    }

    Ok(subkeys)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_PUBLIC: &str = include_str!("../../../tests/fixtures/pgp/alice.pub.asc");
    const ALICE_SECRET: &str = include_str!("../../../tests/fixtures/pgp/alice.sec.asc");
    const BOB_SECRET: &str = include_str!("../../../tests/fixtures/pgp/bob.sec.asc");
    const MALLORY_SECRET: &str = include_str!("../../../tests/fixtures/pgp/mallory.sec.asc");
    const TEAM_PUBLIC: &str = include_str!("../../../tests/fixtures/pgp/team.pub.asc");

    #[test]
    fn test_encode_decode_roundtrip() {
        let encoded = Pgp
            .encode(b"Hello, World!", &mut ALICE_PUBLIC.as_bytes())
            .unwrap();
        let decoded = Pgp.decode(&encoded, &mut ALICE_SECRET.as_bytes()).unwrap();

        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_envelope_is_base64_of_binary_message() {
        let encoded = Pgp.encode(b"payload", &mut ALICE_PUBLIC.as_bytes()).unwrap();
        let text = String::from_utf8(encoded.clone()).unwrap();
        assert!(!text.contains("BEGIN PGP"));

        let raw = envelope::decode_base64(&encoded).unwrap();
        // OpenPGP packet header: high bit always set
        assert_eq!(raw[0] & 0x80, 0x80);
    }

    #[test]
    fn test_keyring_with_two_keys_reaches_both() {
        let encoded = Pgp.encode(b"shared", &mut TEAM_PUBLIC.as_bytes()).unwrap();

        assert_eq!(
            Pgp.decode(&encoded, &mut ALICE_SECRET.as_bytes()).unwrap(),
            b"shared"
        );
        assert_eq!(
            Pgp.decode(&encoded, &mut BOB_SECRET.as_bytes()).unwrap(),
            b"shared"
        );
    }

    #[test]
    fn test_decode_with_wrong_key_fails() {
        let encoded = Pgp.encode(b"secret", &mut ALICE_PUBLIC.as_bytes()).unwrap();
        let err = Pgp
            .decode(&encoded, &mut MALLORY_SECRET.as_bytes())
            .unwrap_err();

        assert!(matches!(err, CipherError::DecryptionFailed(_)));
    }

    #[test]
    fn test_binary_keyrings() {
        let (public, _) = SignedPublicKey::from_string(ALICE_PUBLIC).unwrap();
        let (secret, _) = SignedSecretKey::from_string(ALICE_SECRET).unwrap();
        let public = public.to_bytes().unwrap();
        let secret = secret.to_bytes().unwrap();

        let encoded = Pgp.encode(b"binary", &mut &public[..]).unwrap();
        assert_eq!(Pgp.decode(&encoded, &mut &secret[..]).unwrap(), b"binary");
    }

    #[test]
    fn test_garbage_keyring_is_invalid() {
        let err = Pgp
            .encode(b"data", &mut "not a keyring".as_bytes())
            .unwrap_err();
        assert!(matches!(err, CipherError::KeyMaterialInvalid(_)));
    }

    #[test]
    fn test_secret_keyring_required_for_decode() {
        let encoded = Pgp.encode(b"data", &mut ALICE_PUBLIC.as_bytes()).unwrap();
        let err = Pgp
            .decode(&encoded, &mut ALICE_PUBLIC.as_bytes())
            .unwrap_err();
        assert!(matches!(err, CipherError::KeyMaterialInvalid(_)));
    }

    #[test]
    fn test_invalid_base64_is_malformed() {
        let err = Pgp
            .decode(b"%%%", &mut ALICE_SECRET.as_bytes())
            .unwrap_err();
        assert!(matches!(err, CipherError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_key_without_encryption_subkey_is_invalid() {
        let mut keys = read_public_keyring(&mut ALICE_PUBLIC.as_bytes()).unwrap();
        assert!(!encryption_subkeys(&keys).unwrap().is_empty());

        keys[0].public_subkeys.clear();
        let err = encryption_subkeys(&keys).unwrap_err();
        match err {
            CipherError::KeyMaterialInvalid(msg) => assert!(msg.contains("key #1"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

//! Test fixtures: key material and sample values.

use std::path::PathBuf;

use age::secrecy::ExposeSecret;

use super::Test;

/// Values used by the multi-entry tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("app/database_url", "postgres://localhost/mydb"),
    ("app/api_key", "sk-test-12345"),
    ("app/jwt_secret", "super-secret-jwt-token"),
];

/// Armored OpenPGP fixture, e.g. `pgp_fixture("alice.pub.asc")`.
pub fn pgp_fixture(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/pgp")
        .join(file)
}

/// Contents of an OpenPGP fixture.
pub fn pgp_key(file: &str) -> String {
    std::fs::read_to_string(pgp_fixture(file)).expect("missing pgp fixture")
}

/// A freshly generated age key pair as file contents.
pub struct AgeKeyPair {
    pub recipient: String,
    pub identity: String,
}

impl AgeKeyPair {
    pub fn generate() -> Self {
        let identity = age::x25519::Identity::generate();
        Self {
            recipient: format!("{}\n", identity.to_public()),
            identity: format!(
                "# created: test\n{}\n",
                identity.to_string().expose_secret()
            ),
        }
    }
}

impl Test {
    /// Install `name`'s OpenPGP keys at the default `.pubring.gpg` and
    /// `.secring.gpg` paths.
    pub fn install_pgp(&self, name: &str) {
        self.write(".pubring.gpg", pgp_key(&format!("{name}.pub.asc")));
        self.write(".secring.gpg", pgp_key(&format!("{name}.sec.asc")));
    }

    /// Write a fresh age key pair as `<name>.pub` and `<name>.key`.
    pub fn install_age(&self, name: &str) -> AgeKeyPair {
        let keys = AgeKeyPair::generate();
        self.write(&format!("{name}.pub"), &keys.recipient);
        self.write(&format!("{name}.key"), &keys.identity);
        keys
    }

    /// Environment configured through `.crypt.toml` for the age engine,
    /// with a fresh key pair as `<name>.pub` / `<name>.key`.
    pub fn with_age(name: &str) -> (Self, AgeKeyPair) {
        let t = Self::new();
        let keys = t.install_age(name);
        t.write(
            ".crypt.toml",
            format!("engine = \"age\"\nkeyring = \"{name}.pub\"\nsecret_keyring = \"{name}.key\"\n"),
        );
        (t, keys)
    }
}

use std::convert::TryFrom;

use tracing::debug;

use crate::cipher::CipherAdapter;
use crate::error::{Error, Field};
use crate::kdf::{generate_salt, salted_password};
use crate::keys::derive_keys;
use crate::{DEFAULT_ITERATIONS, KEY_LENGTH, SALT_LENGTH};

/// Resolves the SCRAM iteration count from the deployment configuration.
///
/// The lookup is expected to be a fast, synchronous read of a named
/// configuration value. `Ok(None)` means the value is unset and selects
/// [`DEFAULT_ITERATIONS`](constant.DEFAULT_ITERATIONS.html); an `Err` means
/// the stored value is malformed and aborts the derivation.
pub trait IterationSource {
    /// Returns the configured iteration count, or `None` when unset.
    fn iterations(&self) -> Result<Option<i64>, Error>;
}

/// The persist-ready credential record for one account password.
///
/// Holds everything a SCRAM-SHA-1 verification layer needs to check a login
/// later: the salt and iteration count to reproduce the derivation, and the
/// stored and server keys to compare against. The salted password and client
/// key never appear here. A record is immutable once produced; a password
/// change builds a whole new one with a fresh salt.
#[derive(Clone, Debug, PartialEq)]
pub struct CredentialMaterial {
    salt: [u8; SALT_LENGTH],
    iterations: u32,
    stored_key: [u8; KEY_LENGTH],
    server_key: [u8; KEY_LENGTH],
    encrypted_password: Option<String>,
}

impl CredentialMaterial {
    /// The raw random salt. Persisted under the `salt` attribute.
    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    /// The iteration count the salt was stretched with. Persisted under the
    /// `iteration` attribute.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// The raw stored key. Persisted under the `storedKey` attribute.
    pub fn stored_key(&self) -> &[u8; KEY_LENGTH] {
        &self.stored_key
    }

    /// The raw server key. Persisted under the `serverKey` attribute.
    pub fn server_key(&self) -> &[u8; KEY_LENGTH] {
        &self.server_key
    }

    /// The password ciphertext for the legacy recovery path, when that path
    /// was enabled. Persisted under the `encryptedPassword` attribute; the
    /// attribute is omitted entirely when this is `None`.
    pub fn encrypted_password(&self) -> Option<&str> {
        self.encrypted_password.as_deref()
    }

    /// The salt in the base64 form the attribute contract requires.
    pub fn salt_base64(&self) -> String {
        base64::encode(&self.salt)
    }

    /// The stored key in the base64 form the attribute contract requires.
    pub fn stored_key_base64(&self) -> String {
        base64::encode(&self.stored_key)
    }

    /// The server key in the base64 form the attribute contract requires.
    pub fn server_key_base64(&self) -> String {
        base64::encode(&self.server_key)
    }
}

/// Builds [`CredentialMaterial`](struct.CredentialMaterial.html) records.
///
/// This is the single entry point used by account create and password change
/// flows. The assembler is stateless between calls and performs no I/O; the
/// caller persists the returned record and is responsible for serializing
/// concurrent writes to the same account.
pub struct CredentialAssembler<'a, S: IterationSource> {
    source: &'a S,
    recovery: Option<CipherAdapter<'a>>,
}

impl<'a, S: IterationSource> CredentialAssembler<'a, S> {
    /// Creates an assembler that stores SCRAM verifier material only.
    ///
    /// The reversible-encryption path stays off; the resulting records carry
    /// no encrypted password.
    pub fn new(source: &'a S) -> Self {
        CredentialAssembler {
            source,
            recovery: None,
        }
    }

    /// Creates an assembler with the legacy plaintext-recovery path enabled.
    ///
    /// Every produced record additionally carries the password encrypted
    /// through `adapter`. An unkeyed adapter makes every
    /// [`obfuscate`](#method.obfuscate) call fail with
    /// [`Error::MissingKeyMaterial`](enum.Error.html); enabling recovery
    /// without key material is a configuration defect, not a reason to drop
    /// the field silently.
    pub fn with_recovery(source: &'a S, adapter: CipherAdapter<'a>) -> Self {
        CredentialAssembler {
            source,
            recovery: Some(adapter),
        }
    }

    /// Derives fresh credential material for `password`.
    ///
    /// Draws a new 24-byte salt, stretches the password with the configured
    /// iteration count and derives the verifier keys. The salted password
    /// and client key are scrubbed before this returns; the cleartext
    /// password itself is borrowed from the caller and stays the caller's
    /// responsibility.
    ///
    /// # Return value
    ///
    /// * `Error::Configuration(Field::Iterations)` when the iteration source
    ///   reports a malformed value.
    /// * `Error::MissingKeyMaterial` when recovery is enabled on an unkeyed
    ///   adapter.
    pub fn obfuscate(&self, password: &str) -> Result<CredentialMaterial, Error> {
        let iterations = self.resolve_iterations()?;
        let salt = generate_salt();

        let salted = salted_password(password.as_bytes(), &salt, iterations)?;
        let keys = derive_keys(&salted);
        drop(salted);

        let encrypted_password = match &self.recovery {
            Some(adapter) => Some(adapter.encrypt(password)?),
            None => None,
        };

        let recovery = encrypted_password.is_some();
        debug!(iterations, recovery, "derived SCRAM credential material");

        Ok(CredentialMaterial {
            salt,
            iterations,
            stored_key: keys.stored_key,
            server_key: keys.server_key,
            encrypted_password,
        })
    }

    // Unset and non-positive values select the default; a value that doesn't
    // fit an u32 is malformed.
    fn resolve_iterations(&self) -> Result<u32, Error> {
        match self.source.iterations()? {
            Some(value) if value > 0 => {
                u32::try_from(value).map_err(|_| Error::Configuration(Field::Iterations))
            }
            _ => Ok(DEFAULT_ITERATIONS),
        }
    }
}

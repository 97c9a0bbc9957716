use tracing::debug;

use crate::error::Error;

/// A reversible symmetric cipher supplied by the deployment.
///
/// Some installations still authenticate legacy clients with mechanisms that
/// need the cleartext password back, so the account store keeps an encrypted
/// copy next to the SCRAM verifier keys. The cipher itself (historically
/// Blowfish-CBC keyed by a system-wide secret) is an external collaborator;
/// this crate only defines the call contract. The ciphertext encoding is
/// cipher-defined and opaque to this crate.
///
/// Implementations whose backing provider can be absent at runtime should
/// report that as [`Error::AlgorithmUnavailable`](enum.Error.html).
pub trait Encryptor {
    /// Encrypts a cleartext password into an opaque ciphertext string.
    fn encrypt(&self, plaintext: &str) -> Result<String, Error>;

    /// Decrypts a ciphertext string produced by
    /// [`encrypt`](#tymethod.encrypt) back into the cleartext password.
    fn decrypt(&self, ciphertext: &str) -> Result<String, Error>;
}

/// Gates the reversible cipher on configured key material.
///
/// The cipher key is a system-level secret that may simply not be configured;
/// deployments that only store SCRAM verifiers run with an
/// [`unkeyed`](#method.unkeyed) adapter. Both operations then fail with
/// [`Error::MissingKeyMaterial`](enum.Error.html) instead of producing
/// ciphertext under a made-up key.
pub struct CipherAdapter<'a> {
    cipher: Option<&'a dyn Encryptor>,
}

impl<'a> CipherAdapter<'a> {
    /// Creates an adapter around a configured cipher.
    pub fn new(cipher: &'a dyn Encryptor) -> Self {
        CipherAdapter {
            cipher: Some(cipher),
        }
    }

    /// Creates an adapter for a deployment without cipher key material.
    pub fn unkeyed() -> Self {
        CipherAdapter { cipher: None }
    }

    /// Encrypts a cleartext password for the legacy recovery path.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        match self.cipher {
            Some(cipher) => cipher.encrypt(plaintext),
            None => Err(Error::MissingKeyMaterial),
        }
    }

    /// Decrypts a persisted password ciphertext.
    ///
    /// This is the administrative entry point used by legacy and migration
    /// tooling. Normal provisioning never reads the encrypted password back.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, Error> {
        match self.cipher {
            Some(cipher) => {
                debug!("recovering cleartext password through the configured cipher");
                cipher.decrypt(ciphertext)
            }
            None => Err(Error::MissingKeyMaterial),
        }
    }

    /// Returns `true` when cipher key material is configured.
    pub fn keyed(&self) -> bool {
        self.cipher.is_some()
    }
}

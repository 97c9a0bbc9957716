//! # SCRAM-SHA-1 credential material
//!
//! This library produces the password-verifier material a directory service
//! has to persist so that its accounts can authenticate through SCRAM-SHA-1
//! (RFC 5802) without the service ever retaining the cleartext password.
//! It covers salt generation, the iterated HMAC-SHA1 stretching of the
//! password and the derivation of the stored and server keys. The SASL
//! handshake itself and the persistence of the material are jobs for the
//! surrounding service, not for this crate.
//!
//! # Usage
//!
//! The iteration count comes from the deployment configuration, so the entry
//! point is parameterized over an [`IterationSource`](trait.IterationSource.html).
//! Implement it against your configuration store and hand it to a
//! [`CredentialAssembler`](struct.CredentialAssembler.html). Every call to
//! [`obfuscate`](struct.CredentialAssembler.html#method.obfuscate) draws a
//! fresh salt, so a password change always yields entirely new material.
//!
//! ```rust
//! use scram_credential::{CredentialAssembler, Error, IterationSource};
//!
//! struct Settings;
//!
//! impl IterationSource for Settings {
//!     fn iterations(&self) -> Result<Option<i64>, Error> {
//!         // Look the value up in your configuration store; `None` selects
//!         // the default of 4096.
//!         Ok(None)
//!     }
//! }
//!
//! let settings = Settings;
//! let assembler = CredentialAssembler::new(&settings);
//! let material = assembler.obfuscate("correct horse battery staple").unwrap();
//!
//! // Hand these to the account store.
//! assert_eq!(material.salt().len(), 24);
//! assert_eq!(material.stored_key_base64().len(), 28);
//! assert!(material.encrypted_password().is_none());
//! ```
//!
//! Deployments that still need to recover a cleartext password for a legacy,
//! non-SCRAM mechanism can plug a reversible cipher into the assembler via
//! [`CredentialAssembler::with_recovery`](struct.CredentialAssembler.html#method.with_recovery).
//! That path is strictly opt-in and stays out of the verifier derivation.

mod cipher;
mod credential;
mod error;
mod kdf;
mod keys;

pub use cipher::{CipherAdapter, Encryptor};
pub use credential::{CredentialAssembler, CredentialMaterial, IterationSource};
pub use error::{Error, Field};
pub use kdf::{generate_salt, salted_password};
pub use keys::{derive_keys, ScramKeys};

/// Output length of SHA-1 and therefore of every derived key, in bytes.
pub const KEY_LENGTH: usize = 20;

/// Length of the per-credential random salt, in bytes.
pub const SALT_LENGTH: usize = 24;

/// Iteration count used when the configuration doesn't provide one.
pub const DEFAULT_ITERATIONS: u32 = 4096;

use std::{error, fmt};

/// The credential derivation error cases.
///
/// Every failure is structural: it points at a defective deployment
/// configuration or platform, never at a transient fault, so callers must
/// abort the enclosing account create or modify operation instead of
/// retrying. Partial credential material is never returned.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A configuration value was malformed. `Field` contains the value in
    /// question.
    Configuration(Field),
    /// Reversible encryption or decryption was requested but the deployment
    /// configured no cipher key material.
    MissingKeyMaterial,
    /// The platform lacks a required cryptographic primitive. The string
    /// names the missing algorithm. This is a startup-class failure.
    AlgorithmUnavailable(&'static str),
}

/// The configuration values validated by this crate.
#[derive(Debug, PartialEq)]
pub enum Field {
    /// SCRAM iteration count
    Iterations,
    /// Reversible cipher key material
    CipherKey,
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use self::Error::*;
        match *self {
            Configuration(ref field) => write!(fmt, "Invalid configuration value {:?}", field),
            MissingKeyMaterial => write!(fmt, "No cipher key material configured"),
            AlgorithmUnavailable(name) => write!(fmt, "Algorithm unavailable: {}", name),
        }
    }
}

impl error::Error for Error {}

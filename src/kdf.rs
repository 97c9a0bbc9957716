use rand::rngs::OsRng;
use rand::RngCore;
use ring::hmac;
use zeroize::Zeroizing;

use crate::error::{Error, Field};
use crate::{KEY_LENGTH, SALT_LENGTH};

/// Draws a fresh random salt from the operating system.
///
/// `OsRng` is a shared handle onto the platform entropy source and is safe
/// to use from concurrently deriving threads. An exhausted or missing
/// entropy source aborts the process; that condition is fatal and not worth
/// surfacing as a recoverable error.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Stretches a password into the 20-byte SCRAM `SaltedPassword`.
///
/// This is exactly one output block of PBKDF2(HMAC-SHA1, password, salt,
/// iterations) as required by RFC 5802: the password keys the HMAC,
/// `U1 = HMAC(salt || INT(1))`, and each further round HMACs the previous
/// round and XORs it into the accumulator. `iterations == 1` returns `U1`
/// unmodified. The bit-exact folding matters; anything else produces
/// verifiers no SCRAM-SHA-1 client can match.
///
/// The password may be empty and the salt may have any length, although
/// callers of this crate always pass the 24-byte salt from
/// [`generate_salt`](fn.generate_salt.html).
///
/// The returned buffer zeroes itself on drop. Callers must not persist or
/// log it; only the keys derived from it by
/// [`derive_keys`](fn.derive_keys.html) may leave the process.
///
/// # Return value
///
/// `Error::Configuration(Field::Iterations)` if `iterations` is zero. A zero
/// count is always a configuration defect and is never silently defaulted
/// here.
pub fn salted_password(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LENGTH]>, Error> {
    if iterations == 0 {
        return Err(Error::Configuration(Field::Iterations));
    }

    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, password);

    // U1 = HMAC(password, salt || 0x00000001)
    let mut message = Vec::with_capacity(salt.len() + 4);
    message.extend_from_slice(salt);
    message.extend_from_slice(&1u32.to_be_bytes());
    let mut round = hmac::sign(&key, &message);

    let mut folded = Zeroizing::new([0u8; KEY_LENGTH]);
    folded.copy_from_slice(round.as_ref());

    // Ui = HMAC(password, Ui-1), XORed into the accumulator byte-wise. Each
    // round gets a fresh tag rather than folding in place.
    for _ in 1..iterations {
        round = hmac::sign(&key, round.as_ref());
        for (acc, byte) in folded.iter_mut().zip(round.as_ref()) {
            *acc ^= byte;
        }
    }

    Ok(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    // PBKDF2-HMAC-SHA1 vectors from RFC 6070, section 2 (dkLen = 20).
    const RFC6070_C1: &str = "0c60c80f961f0e71f3a9b524af6012062fe037a6";
    const RFC6070_C2: &str = "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957";
    const RFC6070_C4096: &str = "4b007901b765489abead49d926f721d065a429c1";

    #[test]
    fn single_iteration_is_one_hmac() {
        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, b"pencil");
        let expected = hmac::sign(&key, b"QSXCR+Q6sek8bf92\x00\x00\x00\x01");

        let derived = salted_password(b"pencil", b"QSXCR+Q6sek8bf92", 1).unwrap();
        assert_eq!(&derived[..], expected.as_ref());
    }

    #[test]
    fn matches_rfc6070_iteration_1() {
        let derived = salted_password(b"password", b"salt", 1).unwrap();
        assert_eq!(hex::encode(&derived[..]), RFC6070_C1);
    }

    #[test]
    fn matches_rfc6070_iteration_2() {
        let derived = salted_password(b"password", b"salt", 2).unwrap();
        assert_eq!(hex::encode(&derived[..]), RFC6070_C2);
    }

    #[test]
    fn matches_rfc6070_iteration_4096() {
        let derived = salted_password(b"password", b"salt", 4096).unwrap();
        assert_eq!(hex::encode(&derived[..]), RFC6070_C4096);
    }

    #[test]
    fn two_rounds_fold_by_xor() {
        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, b"secret");
        let u1 = hmac::sign(&key, b"NaCl\x00\x00\x00\x01");
        let u2 = hmac::sign(&key, u1.as_ref());
        let expected: Vec<u8> = u1
            .as_ref()
            .iter()
            .zip(u2.as_ref())
            .map(|(a, b)| a ^ b)
            .collect();

        let derived = salted_password(b"secret", b"NaCl", 2).unwrap();
        assert_eq!(&derived[..], &expected[..]);
    }

    #[test]
    fn derivation_is_deterministic() {
        let first = salted_password(b"Secret123!", b"some-salt", 128).unwrap();
        let second = salted_password(b"Secret123!", b"some-salt", 128).unwrap();
        assert_eq!(&first[..], &second[..]);
    }

    #[test]
    fn empty_password_is_accepted() {
        let derived = salted_password(b"", b"salt", 16).unwrap();
        assert_eq!(derived.len(), KEY_LENGTH);
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let result = salted_password(b"password", b"salt", 0);
        assert!(matches!(
            result,
            Err(Error::Configuration(Field::Iterations))
        ));
    }

    #[test]
    fn salts_are_fresh_and_sized() {
        let first = generate_salt();
        let second = generate_salt();
        assert_eq!(first.len(), SALT_LENGTH);
        assert_ne!(first, second);
    }
}

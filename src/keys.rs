use ring::digest;
use ring::hmac;
use zeroize::Zeroize;

use crate::KEY_LENGTH;

/// The persistable SCRAM-SHA-1 verifier keys derived from a salted password.
///
/// `StoredKey` is one-way with respect to the salted password and the
/// password itself, and `ServerKey` reveals neither, so both are safe to
/// hand to the account store. The intermediate `ClientKey` is deliberately
/// absent: it is hashed into `stored_key` and scrubbed before
/// [`derive_keys`](fn.derive_keys.html) returns.
#[derive(Debug, PartialEq)]
pub struct ScramKeys {
    /// `SHA1(HMAC-SHA1(SaltedPassword, "Client Key"))`
    pub stored_key: [u8; KEY_LENGTH],
    /// `HMAC-SHA1(SaltedPassword, "Server Key")`
    pub server_key: [u8; KEY_LENGTH],
}

/// Derives the verifier keys from a salted password, per RFC 5802 section 3.
///
/// The client key lives in a local buffer that is zeroed as soon as the
/// stored key has been computed. This is best-effort scrubbing: the HMAC tag
/// `ring` hands back is a plain copy type and cannot be wiped.
pub fn derive_keys(salted_password: &[u8; KEY_LENGTH]) -> ScramKeys {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, salted_password);

    let mut client_key = [0u8; KEY_LENGTH];
    client_key.copy_from_slice(hmac::sign(&key, b"Client Key").as_ref());

    let mut stored_key = [0u8; KEY_LENGTH];
    stored_key.copy_from_slice(digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &client_key).as_ref());
    client_key.zeroize();

    let mut server_key = [0u8; KEY_LENGTH];
    server_key.copy_from_slice(hmac::sign(&key, b"Server Key").as_ref());

    ScramKeys {
        stored_key,
        server_key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::salted_password;

    #[test]
    fn stored_key_is_sha1_of_client_key() {
        let salted = salted_password(b"pencil", b"QSXCR+Q6sek8bf92", 4096).unwrap();
        let keys = derive_keys(&salted);

        let hmac_key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, &salted[..]);
        let client_key = hmac::sign(&hmac_key, b"Client Key");
        let expected = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, client_key.as_ref());

        assert_eq!(&keys.stored_key[..], expected.as_ref());
    }

    #[test]
    fn server_key_is_hmac_over_server_key_literal() {
        let salted = salted_password(b"pencil", b"QSXCR+Q6sek8bf92", 4096).unwrap();
        let keys = derive_keys(&salted);

        let hmac_key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, &salted[..]);
        let expected = hmac::sign(&hmac_key, b"Server Key");

        assert_eq!(&keys.server_key[..], expected.as_ref());
    }

    #[test]
    fn different_salted_passwords_give_different_keys() {
        let first = derive_keys(&salted_password(b"password", b"salt-a", 64).unwrap());
        let second = derive_keys(&salted_password(b"password", b"salt-b", 64).unwrap());
        assert_ne!(first, second);
    }
}

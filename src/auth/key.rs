/// Key Derivation
///
/// Sizes an AES-128 key from an arbitrary-length secret string.
/// The key is the first 16 bytes of SHA-1(secret). This is a plain
/// truncation, not a password KDF: no salt, no iterations.

use sha1::{Digest, Sha1};

/// Length of the derived AES-128 key in bytes
pub const KEY_LEN: usize = 16;

/// Derive the refresh-token encryption key from the configured secret
///
/// Deterministic: the same secret always yields the same key.
pub fn derive_key(secret: &str) -> [u8; KEY_LEN] {
    let digest = Sha1::digest(secret.as_bytes());
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest[..KEY_LEN]);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_is_deterministic() {
        assert_eq!(derive_key("s3cr3t"), derive_key("s3cr3t"));
    }

    #[test]
    fn test_different_secrets_different_keys() {
        assert_ne!(derive_key("s3cr3t"), derive_key("s3cr3t!"));
    }

    #[test]
    fn test_key_is_truncated_sha1() {
        // SHA-1("abc") = a9993e364706816aba3e25717850c26c9cd0d89d
        let expected = [
            0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78, 0x50,
            0xc2, 0x6c,
        ];
        assert_eq!(derive_key("abc"), expected);
    }

    #[test]
    fn test_empty_secret_still_yields_key() {
        assert_eq!(derive_key("").len(), KEY_LEN);
    }
}

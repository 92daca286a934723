/// Refresh Token Encryption
///
/// The signed refresh token is sealed with AES-128-GCM before it leaves the
/// server, so clients hold an opaque string:
///
///   base64url(nonce (12 bytes) || ciphertext || tag (16 bytes))
///
/// - The key is derived from the configured secret (see `key::derive_key`)
/// - A fresh nonce is drawn from the OS CSPRNG for every encryption
/// - Decryption failures are reported as one generic error

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes128Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::auth::key::derive_key;
use crate::error::TokenError;

/// AES-GCM nonce size in bytes
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag size in bytes
pub const TAG_LEN: usize = 16;

fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

fn cipher_for(secret: &str) -> Aes128Gcm {
    let key = derive_key(secret);
    Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&key))
}

/// Encrypt a signed refresh token for delivery to the client
///
/// # Errors
/// `KeyUnavailable` if the secret is empty, `Internal` if sealing fails
pub fn encrypt_refresh_token(plaintext: &str, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::KeyUnavailable);
    }

    let nonce = generate_nonce();
    let sealed = cipher_for(secret)
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| TokenError::Internal(format!("Encryption failed: {}", e)))?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);

    Ok(URL_SAFE.encode(out))
}

/// Recover the signed refresh token from its encrypted form
///
/// # Errors
/// `DecryptionFailure` for bad encoding, short input, tag mismatch, wrong
/// key, or non-UTF-8 plaintext; `KeyUnavailable` if the secret is empty
pub fn decrypt_refresh_token(token: &str, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::KeyUnavailable);
    }

    let data = URL_SAFE
        .decode(token)
        .map_err(|_| TokenError::DecryptionFailure)?;

    if data.len() < NONCE_LEN {
        return Err(TokenError::DecryptionFailure);
    }

    let (nonce, sealed) = data.split_at(NONCE_LEN);
    let plaintext = cipher_for(secret)
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| TokenError::DecryptionFailure)?;

    String::from_utf8(plaintext).map_err(|_| TokenError::DecryptionFailure)
}

/// Short SHA-256 fingerprint of a token, safe to put in logs
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "s3cr3t";

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let long = "x".repeat(10_000);
        let plaintexts = ["header.payload.signature", "", long.as_str(), "Xin chào 🔐 토큰"];

        for plaintext in plaintexts {
            let encrypted = encrypt_refresh_token(plaintext, SECRET).expect("Failed to encrypt");
            let decrypted = decrypt_refresh_token(&encrypted, SECRET).expect("Failed to decrypt");

            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_output_layout() {
        let plaintext = "abc";
        let encrypted = encrypt_refresh_token(plaintext, SECRET).unwrap();
        let raw = URL_SAFE.decode(&encrypted).unwrap();

        assert_eq!(raw.len(), NONCE_LEN + plaintext.len() + TAG_LEN);
        assert!(encrypted
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    #[test]
    fn test_nonce_is_fresh_per_encryption() {
        let first = encrypt_refresh_token("same", SECRET).unwrap();
        let second = encrypt_refresh_token("same", SECRET).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_every_bit_flip_is_detected() {
        let encrypted = encrypt_refresh_token("refresh.token.value", SECRET).unwrap();
        let raw = URL_SAFE.decode(&encrypted).unwrap();

        for byte in 0..raw.len() {
            for bit in 0..8 {
                let mut tampered = raw.clone();
                tampered[byte] ^= 1 << bit;
                let result = decrypt_refresh_token(&URL_SAFE.encode(&tampered), SECRET);

                assert_eq!(
                    result.unwrap_err(),
                    TokenError::DecryptionFailure,
                    "flip of bit {} in byte {} was not detected",
                    bit,
                    byte
                );
            }
        }
    }

    #[test]
    fn test_wrong_secret_fails() {
        let encrypted = encrypt_refresh_token("value", SECRET).unwrap();
        let result = decrypt_refresh_token(&encrypted, "different");

        assert_eq!(result.unwrap_err(), TokenError::DecryptionFailure);
    }

    #[test]
    fn test_bad_encoding_and_short_input_fail_generically() {
        assert_eq!(
            decrypt_refresh_token("not base64!!", SECRET).unwrap_err(),
            TokenError::DecryptionFailure
        );
        assert_eq!(
            decrypt_refresh_token(&URL_SAFE.encode([0u8; NONCE_LEN - 1]), SECRET).unwrap_err(),
            TokenError::DecryptionFailure
        );
        assert_eq!(
            decrypt_refresh_token(&URL_SAFE.encode([0u8; NONCE_LEN]), SECRET).unwrap_err(),
            TokenError::DecryptionFailure
        );
    }

    #[test]
    fn test_empty_secret_is_key_unavailable() {
        assert_eq!(
            encrypt_refresh_token("value", "").unwrap_err(),
            TokenError::KeyUnavailable
        );
        assert_eq!(
            decrypt_refresh_token("AAAA", "").unwrap_err(),
            TokenError::KeyUnavailable
        );
    }

    #[test]
    fn test_token_fingerprint() {
        let fingerprint = token_fingerprint("token");

        assert_eq!(fingerprint.len(), 16);
        assert_eq!(fingerprint, token_fingerprint("token"));
        assert_ne!(fingerprint, token_fingerprint("other"));
    }
}

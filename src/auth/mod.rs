/// Authentication module
///
/// Handles key derivation, refresh token encryption, JWT signing/validation,
/// and the token lifecycle service built on top of them.

mod claims;
mod jwt;
mod key;
mod refresh_token;
mod service;

pub use claims::{AccessClaims, RefreshClaims, TokenClaims};
pub use jwt::{sign_token, verify_token};
pub use key::{derive_key, KEY_LEN};
pub use refresh_token::{
    decrypt_refresh_token, encrypt_refresh_token, token_fingerprint, NONCE_LEN, TAG_LEN,
};
pub use service::{extract_bearer, TokenPair, TokenService};

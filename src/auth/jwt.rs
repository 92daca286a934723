/// JWT Token Signing and Verification
///
/// Compact HS256 tokens keyed with the raw configured secret. Unlike the
/// refresh-token cipher, the secret is used as-is with no derivation.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::TokenClaims;
use crate::error::TokenError;

/// Sign a claim set for `subject_id` expiring at `expires_at` (Unix seconds)
///
/// # Errors
/// `KeyUnavailable` if the secret is empty, `Internal` if encoding fails
pub fn sign_token<C: TokenClaims>(
    subject_id: i64,
    expires_at: i64,
    secret: &str,
) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::KeyUnavailable);
    }

    let claims = C::new(subject_id, expires_at);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify a token's signature and lifetime and extract its claims
///
/// The signature is checked (in constant time) before any claim is trusted.
/// A token is expired once `exp <= now`; a future `nbf` is rejected as
/// `NotYetValid`.
///
/// # Errors
/// `Malformed`, `InvalidSignature`, `Expired`, `NotYetValid`, or
/// `KeyUnavailable` if the secret is empty
pub fn verify_token<C: TokenClaims>(token: &str, secret: &str) -> Result<C, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::KeyUnavailable);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_nbf = true;
    // exp is checked below so that exp == now counts as expired. The library
    // parses exp as u64, so a negative exp would otherwise look missing.
    validation.validate_exp = false;
    validation.set_required_spec_claims::<&str>(&[]);

    let claims = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)?;

    if claims.is_expired_at(chrono::Utc::now().timestamp()) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

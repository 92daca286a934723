/// Token Service
///
/// Stateless orchestration of the token lifecycle:
/// - `issue_pair` at login: signed access token + encrypted signed refresh token
/// - `validate_access` on every protected request
/// - `refresh` to trade a refresh token for a new access token
///
/// Refresh tokens are not rotated or revoked on use; one remains valid until
/// its own expiry.

use std::sync::Arc;

use serde::Serialize;

use crate::auth::claims::{AccessClaims, RefreshClaims, TokenClaims};
use crate::auth::jwt::{sign_token, verify_token};
use crate::auth::refresh_token::{decrypt_refresh_token, encrypt_refresh_token, token_fingerprint};
use crate::configuration::JwtSettings;
use crate::error::{ConfigError, ErrorContext, TokenError};

/// Tokens handed to the client at login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Extract the credential from an `Authorization: Bearer <token>` value
///
/// # Errors
/// `MissingToken` if the header is absent, empty, or uses another scheme
pub fn extract_bearer(header_value: Option<&str>) -> Result<&str, TokenError> {
    let value = header_value.map(str::trim).ok_or(TokenError::MissingToken)?;
    let (scheme, token) = value.split_once(' ').ok_or(TokenError::MissingToken)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::MissingToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::MissingToken);
    }
    Ok(token)
}

#[derive(Debug, Clone)]
pub struct TokenService {
    settings: Arc<JwtSettings>,
}

impl TokenService {
    /// Create a token service over shared, validated settings
    ///
    /// # Errors
    /// Returns error if the secret is empty or the TTLs are inconsistent
    pub fn new(settings: Arc<JwtSettings>) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    fn secret(&self) -> &str {
        self.settings.secret.expose()
    }

    fn expiry_from(now: i64, ttl_seconds: i64) -> Result<i64, TokenError> {
        now.checked_add(ttl_seconds)
            .ok_or_else(|| TokenError::Internal("token expiry out of range".to_string()))
    }

    fn sign_access(&self, subject_id: i64, now: i64) -> Result<String, TokenError> {
        sign_token::<AccessClaims>(
            subject_id,
            Self::expiry_from(now, self.settings.access_token_expiry_seconds())?,
            self.secret(),
        )
    }

    /// Issue an access token and an encrypted refresh token for `subject_id`
    ///
    /// # Errors
    /// Propagates signing and encryption failures
    pub fn issue_pair(&self, subject_id: i64) -> Result<TokenPair, TokenError> {
        let context = ErrorContext::new("issue_pair").with_subject_id(subject_id);
        let now = chrono::Utc::now().timestamp();

        let result = self.sign_access(subject_id, now).and_then(|access_token| {
            let refresh_plain = sign_token::<RefreshClaims>(
                subject_id,
                Self::expiry_from(now, self.settings.refresh_token_expiry_seconds())?,
                self.secret(),
            )?;
            let refresh_token = encrypt_refresh_token(&refresh_plain, self.secret())?;
            Ok((access_token, refresh_token))
        });

        match result {
            Ok((access_token, refresh_token)) => {
                tracing::info!(
                    subject_id = subject_id,
                    refresh_fingerprint = %token_fingerprint(&refresh_token),
                    "Token pair issued"
                );
                Ok(TokenPair {
                    access_token,
                    refresh_token,
                    token_type: "Bearer".to_string(),
                    expires_in: self.settings.access_token_expiry_seconds(),
                })
            }
            Err(e) => {
                context.log_error(&e);
                Err(e)
            }
        }
    }

    /// Validate an access token and return its claims
    ///
    /// # Errors
    /// `Malformed`, `InvalidSignature`, `Expired`, or `NotYetValid`
    pub fn validate_access(&self, access_token: &str) -> Result<AccessClaims, TokenError> {
        match verify_token::<AccessClaims>(access_token, self.secret()) {
            Ok(claims) => {
                tracing::debug!(subject_id = claims.subject_id, "Access token validated");
                Ok(claims)
            }
            Err(e) => {
                ErrorContext::new("validate_access")
                    .with_token_fingerprint(token_fingerprint(access_token))
                    .log_error(&e);
                Err(e)
            }
        }
    }

    /// Validate the credential carried in an `Authorization` header value
    pub fn authorize(&self, header_value: Option<&str>) -> Result<AccessClaims, TokenError> {
        let token = extract_bearer(header_value).map_err(|e| {
            ErrorContext::new("authorize").log_error(&e);
            e
        })?;
        self.validate_access(token)
    }

    /// Exchange an encrypted refresh token for a fresh access token
    ///
    /// The refresh token itself is left untouched and stays usable.
    ///
    /// # Errors
    /// `DecryptionFailure`, then any classified verification error
    pub fn refresh(&self, encrypted_refresh_token: &str) -> Result<String, TokenError> {
        let fingerprint = token_fingerprint(encrypted_refresh_token);
        let context = ErrorContext::new("refresh").with_token_fingerprint(fingerprint.clone());

        let result = decrypt_refresh_token(encrypted_refresh_token, self.secret())
            .and_then(|inner| verify_token::<RefreshClaims>(&inner, self.secret()))
            .and_then(|claims| {
                let now = chrono::Utc::now().timestamp();
                self.sign_access(claims.subject_id(), now)
                    .map(|token| (claims.subject_id(), token))
            });

        match result {
            Ok((subject_id, access_token)) => {
                tracing::info!(
                    subject_id = subject_id,
                    refresh_fingerprint = %fingerprint,
                    "Access token refreshed"
                );
                Ok(access_token)
            }
            Err(e) => {
                context.log_error(&e);
                Err(e)
            }
        }
    }
}

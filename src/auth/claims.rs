/// JWT Claims structures
///
/// Access and refresh tokens carry the same minimal payload,
/// `{"id": <subject>, "exp": <unix seconds>}`, and differ only in lifetime.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Common shape of the claim sets this crate signs
pub trait TokenClaims: Serialize + DeserializeOwned {
    fn new(subject_id: i64, expires_at: i64) -> Self;
    fn subject_id(&self) -> i64;
    fn expires_at(&self) -> i64;

    /// Check if token has expired relative to `now` (Unix seconds)
    fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at() <= now
    }
}

/// Claims for short-lived access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject (user ID)
    #[serde(rename = "id")]
    pub subject_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Claims for long-lived refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RefreshClaims {
    #[serde(rename = "id")]
    pub subject_id: i64,
    pub exp: i64,
}

impl TokenClaims for AccessClaims {
    fn new(subject_id: i64, expires_at: i64) -> Self {
        Self {
            subject_id,
            exp: expires_at,
        }
    }

    fn subject_id(&self) -> i64 {
        self.subject_id
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl TokenClaims for RefreshClaims {
    fn new(subject_id: i64, expires_at: i64) -> Self {
        Self {
            subject_id,
            exp: expires_at,
        }
    }

    fn subject_id(&self) -> i64 {
        self.subject_id
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_with_source_field_names() {
        let claims = AccessClaims::new(42, 1_700_000_000);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json, serde_json::json!({"id": 42, "exp": 1_700_000_000}));
    }

    #[test]
    fn test_refresh_claims_accept_extra_fields() {
        let claims: RefreshClaims =
            serde_json::from_str(r#"{"id": 7, "exp": 100, "iat": 50}"#).unwrap();

        assert_eq!(claims.subject_id(), 7);
        assert_eq!(claims.expires_at(), 100);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let claims = AccessClaims::new(1, 1000);

        assert!(!claims.is_expired_at(999));
        assert!(claims.is_expired_at(1000));
        assert!(claims.is_expired_at(1001));
    }
}

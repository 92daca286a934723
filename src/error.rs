/// Error Handling Module
///
/// Unified error types for the token lifecycle:
/// 1. Token errors (classified, returned to the immediate caller untranslated)
/// 2. Configuration errors
/// 3. A central AppError the binary and embedding services map into
/// 4. Structured error logging with context

use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. TOKEN ERRORS
/// ============================================================================

/// Classified failures of issuing, validating, and refreshing tokens
///
/// `DecryptionFailure` deliberately does not say whether the input failed to
/// decode or failed authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token cannot be split or decoded
    Malformed,
    /// HMAC signature does not verify
    InvalidSignature,
    /// `exp` is at or before the current time
    Expired,
    /// `nbf` is in the future
    NotYetValid,
    /// Encrypted refresh token failed to decode or authenticate
    DecryptionFailure,
    /// Secret missing or empty at call time
    KeyUnavailable,
    /// No bearer credential was supplied
    MissingToken,
    /// Random source, cipher, or encoder fault
    Internal(String),
}

impl TokenError {
    /// True for per-request rejections the caller should answer with 401.
    /// False for fatal conditions that indicate a broken deployment.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TokenError::KeyUnavailable | TokenError::Internal(_))
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::InvalidSignature => write!(f, "invalid token signature"),
            TokenError::Expired => write!(f, "token is expired"),
            TokenError::NotYetValid => write!(f, "token not active yet"),
            TokenError::DecryptionFailure => write!(f, "refresh token could not be decrypted"),
            TokenError::KeyUnavailable => write!(f, "signing secret is not configured"),
            TokenError::MissingToken => write!(f, "missing authentication token"),
            TokenError::Internal(msg) => write!(f, "token processing failed: {}", msg),
        }
    }
}

impl StdError for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Internal(err.to_string()),
        }
    }
}

/// ============================================================================
/// 2. CONFIGURATION ERRORS
/// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingRequired(key),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}

/// ============================================================================
/// 3. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Token(TokenError),
    Config(ConfigError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Token(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Token(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

// ============================================================================
// 4. ERROR CONTEXT ENRICHMENT
// ============================================================================

/// Context attached to failure logs
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub subject_id: Option<i64>,
    pub token_fingerprint: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            subject_id: None,
            token_fingerprint: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_subject_id(mut self, subject_id: i64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn with_token_fingerprint(mut self, fingerprint: String) -> Self {
        self.token_fingerprint = Some(fingerprint);
        self
    }

    pub fn log_error(&self, error: &TokenError) {
        let context = serde_json::json!({
            "operation": self.operation,
            "subject_id": self.subject_id,
            "token_fingerprint": self.token_fingerprint,
            "timestamp": self.timestamp.to_rfc3339(),
        });

        if error.is_client_error() {
            tracing::warn!(
                error = %error,
                context = ?context,
                "Token rejected"
            );
        } else {
            tracing::error!(
                error = %error,
                context = ?context,
                "Token processing error"
            );
        }
    }
}

use std::fmt;

use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub auth: JwtSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Signing/encryption secret; redacted in `Debug` output
#[derive(serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

/// JWT authentication settings
#[derive(serde::Deserialize, Clone, Debug)]
pub struct JwtSettings {
    pub secret: Secret,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64, // minutes
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64, // minutes
}

/// Upper bound for either token lifetime: ten years, in minutes
pub const MAX_TOKEN_EXPIRY_MINUTES: i64 = 10 * 365 * 24 * 60;

fn default_access_token_expiry() -> i64 {
    10
}

fn default_refresh_token_expiry() -> i64 {
    1440
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>, access_token_expiry: i64, refresh_token_expiry: i64) -> Self {
        Self {
            secret: Secret::new(secret),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Reject settings the token service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::MissingRequired("auth.secret".to_string()));
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "auth.access_token_expiry must be positive".to_string(),
            ));
        }
        if self.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "auth.refresh_token_expiry must be positive".to_string(),
            ));
        }
        if self.refresh_token_expiry > MAX_TOKEN_EXPIRY_MINUTES {
            return Err(ConfigError::InvalidValue(format!(
                "auth.refresh_token_expiry must not exceed {} minutes",
                MAX_TOKEN_EXPIRY_MINUTES
            )));
        }
        if self.access_token_expiry >= self.refresh_token_expiry {
            return Err(ConfigError::InvalidValue(
                "auth.access_token_expiry must be shorter than auth.refresh_token_expiry"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry.saturating_mul(60)
    }

    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry.saturating_mul(60)
    }
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Settings, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Settings, ConfigError> {
        let settings = settings.try_deserialize::<Settings>()?;
        settings.auth.validate()?;
        Ok(settings)
    }
}

/// Load settings from `configuration.{toml,yaml,json}` and `APP_*` environment variables
///
/// Environment variables win, e.g. `APP_AUTH__SECRET`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    Settings::finish(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_toml() {
        let settings = Settings::from_toml_str(
            r#"
            [auth]
            secret = "s3cr3t"
            access_token_expiry = 10
            refresh_token_expiry = 1440

            [log]
            level = "debug"
            "#,
        )
        .expect("Failed to parse settings");

        assert_eq!(settings.auth.secret.expose(), "s3cr3t");
        assert_eq!(settings.auth.access_token_expiry_seconds(), 600);
        assert_eq!(settings.auth.refresh_token_expiry_seconds(), 86_400);
        assert_eq!(settings.log.level, "debug");
    }

    #[test]
    fn test_defaults_apply() {
        let settings = Settings::from_toml_str("[auth]\nsecret = \"s3cr3t\"\n").unwrap();

        assert_eq!(settings.auth.access_token_expiry, 10);
        assert_eq!(settings.auth.refresh_token_expiry, 1440);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = Settings::from_toml_str("[auth]\naccess_token_expiry = 10\n");
        assert!(result.is_err());

        let result = Settings::from_toml_str("[auth]\nsecret = \"\"\n");
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingRequired("auth.secret".to_string())
        );
    }

    #[test]
    fn test_access_ttl_must_be_shorter_than_refresh_ttl() {
        let settings = JwtSettings::new("s3cr3t", 60, 60);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue(_))
        ));

        let settings = JwtSettings::new("s3cr3t", 0, 60);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_oversized_ttl_is_rejected() {
        let settings = JwtSettings::new("s3cr3t", 10, i64::MAX / 30);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue(_))
        ));

        let settings = JwtSettings::new("s3cr3t", 10, MAX_TOKEN_EXPIRY_MINUTES + 1);
        assert!(settings.validate().is_err());

        let settings = JwtSettings::new("s3cr3t", 10, MAX_TOKEN_EXPIRY_MINUTES);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let settings = JwtSettings::new("s3cr3t", 10, 1440);
        let debug = format!("{:?}", settings);

        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("REDACTED"));
    }
}

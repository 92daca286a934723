use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError};

/// Install structured JSON logging on stderr, keeping stdout for command output.
/// `RUST_LOG` overrides `default_level` when set.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn try_init_telemetry(default_level: &str) -> Result<(), TryInitError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init()
}

/// Like `try_init_telemetry`, but keeps the existing subscriber if one is set.
pub fn init_telemetry(default_level: &str) {
    if let Err(e) = try_init_telemetry(default_level) {
        tracing::debug!("Telemetry already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_initialization_is_rejected() {
        init_telemetry("debug");
        assert!(try_init_telemetry("debug").is_err());
    }
}

//! Application error handling with Sentry integration.
//!
//! The cart itself never fails: its operations recover locally and log.
//! `AppError` covers the few things that can stop the `sweetcart` binary,
//! and [`AppError::report`] captures them to Sentry before exiting.

use std::process::ExitCode;

use thiserror::Error;

use crate::config::ConfigError;

/// Application-level error type for the `sweetcart` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Page rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Writing the page snapshot failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Log the error, capture it to Sentry and pick an exit code.
    #[must_use]
    pub fn report(&self) -> ExitCode {
        // Configuration problems are operator mistakes, not bugs
        if matches!(self, Self::Config(_)) {
            tracing::error!(error = %self, "Invalid configuration");
            return ExitCode::from(2);
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Snapshot failed"
        );
        ExitCode::FAILURE
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let config = AppError::from(ConfigError::InvalidEnvVar(
            "SWEETCART_CURRENCY".to_string(),
            "unsupported currency code: XYZ".to_string(),
        ));
        assert_eq!(
            config.to_string(),
            "Configuration error: Invalid environment variable SWEETCART_CURRENCY: unsupported currency code: XYZ"
        );

        let io = AppError::from(std::io::Error::other("disk full"));
        assert_eq!(io.to_string(), "IO error: disk full");
    }
}

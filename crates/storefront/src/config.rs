//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SWEETCART_CATALOG` - Catalog URL or file path (default: ./data.json)
//! - `SWEETCART_STORAGE_PATH` - Saved cart file (default: .sweetcart/storage.json)
//! - `SWEETCART_STORAGE_KEY` - Key the cart is saved under (default: itemStates)
//! - `SWEETCART_OUTPUT` - Write the page snapshot here instead of stdout
//! - `SWEETCART_FETCH_TIMEOUT_SECS` - Catalog fetch timeout (default: 10)
//! - `SWEETCART_CURRENCY` - Display currency (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use sweetcart_core::CurrencyCode;
use thiserror::Error;

use crate::catalog::CatalogSource;
use crate::storage::DEFAULT_STORAGE_KEY;

const DEFAULT_CATALOG: &str = "./data.json";
const DEFAULT_STORAGE_PATH: &str = ".sweetcart/storage.json";
const DEFAULT_FETCH_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Runtime configuration for the `sweetcart` binary.
#[derive(Clone)]
pub struct WidgetConfig {
    /// Where the product catalog is loaded from
    pub catalog: CatalogSource,
    /// File backing the saved cart
    pub storage_path: PathBuf,
    /// Key the cart is saved under
    pub storage_key: String,
    /// Page snapshot destination, stdout when unset
    pub output: Option<PathBuf>,
    /// Catalog fetch timeout
    pub fetch_timeout: Duration,
    /// Display currency
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("catalog", &self.catalog)
            .field("storage_path", &self.storage_path)
            .field("storage_key", &self.storage_key)
            .field("output", &self.output)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("currency", &self.currency)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let catalog =
            CatalogSource::parse(&env.get_or_default("SWEETCART_CATALOG", DEFAULT_CATALOG));
        let storage_path =
            PathBuf::from(env.get_or_default("SWEETCART_STORAGE_PATH", DEFAULT_STORAGE_PATH));
        let storage_key = env.get_or_default("SWEETCART_STORAGE_KEY", DEFAULT_STORAGE_KEY);

        let fetch_timeout = env
            .get_or_default("SWEETCART_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "SWEETCART_FETCH_TIMEOUT_SECS".to_string(),
                    e.to_string(),
                )
            })?;
        let currency = env
            .get_or_default("SWEETCART_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SWEETCART_CURRENCY".to_string(), e.to_string())
            })?;

        Ok(Self {
            catalog,
            storage_path,
            storage_key,
            output: env.get_optional("SWEETCART_OUTPUT").map(PathBuf::from),
            fetch_timeout,
            currency,
            sentry_dsn: env.get_optional("SENTRY_DSN"),
        })
    }
}

/// Variable source with the usual accessors.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Empty values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<WidgetConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WidgetConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.catalog, CatalogSource::File(PathBuf::from("./data.json")));
        assert_eq!(config.storage_path, PathBuf::from(".sweetcart/storage.json"));
        assert_eq!(config.storage_key, "itemStates");
        assert_eq!(config.output, None);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("SWEETCART_CATALOG", "https://cdn.example.com/data.json"),
            ("SWEETCART_STORAGE_KEY", "cart"),
            ("SWEETCART_OUTPUT", "out/index.html"),
            ("SWEETCART_FETCH_TIMEOUT_SECS", "3"),
            ("SWEETCART_CURRENCY", "EUR"),
        ])
        .unwrap();
        assert!(matches!(config.catalog, CatalogSource::Http(_)));
        assert_eq!(config.storage_key, "cart");
        assert_eq!(config.output, Some(PathBuf::from("out/index.html")));
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = config(&[("SWEETCART_FETCH_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SWEETCART_FETCH_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_invalid_currency() {
        let err = config(&[("SWEETCART_CURRENCY", "XYZ")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let config = config(&[("SWEETCART_STORAGE_KEY", "  ")]).unwrap();
        assert_eq!(config.storage_key, "itemStates");
    }

    #[test]
    fn test_debug_redacts_dsn() {
        let config = config(&[("SENTRY_DSN", "https://abc123@o1.ingest.sentry.io/42")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("abc123"));
    }
}

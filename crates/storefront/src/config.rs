//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINA_CATALOG` - Catalog URL or file path (default: data.json)
//! - `VITRINA_STORAGE_PATH` - Storage file for the saved cart (default: .vitrina/storage.json)
//! - `VITRINA_CURRENCY` - Display currency code (default: ARS)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate between 0.0 and 1.0 (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;
use vitrina_core::CurrencyCode;

use crate::catalog::CatalogSource;

const DEFAULT_CATALOG: &str = "data.json";
const DEFAULT_STORAGE_PATH: &str = ".vitrina/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Where the product catalog is loaded from
    pub catalog: CatalogSource,
    /// File holding the saved cart
    pub storage_path: PathBuf,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
    /// Error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
///
/// Implements `Debug` manually to redact the DSN, which embeds a key.
#[derive(Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when unset
    pub dsn: Option<String>,
    /// Environment tag (e.g., production, staging)
    pub environment: Option<String>,
    /// Error event sample rate
    pub sample_rate: f32,
}

impl std::fmt::Debug for SentryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog =
            CatalogSource::parse(&get_or_default(&lookup, "VITRINA_CATALOG", DEFAULT_CATALOG));
        let storage_path = PathBuf::from(get_or_default(
            &lookup,
            "VITRINA_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));
        let currency = get_or_default(&lookup, "VITRINA_CURRENCY", "ARS")
            .parse::<CurrencyCode>()
            .map_err(|e| invalid("VITRINA_CURRENCY", &e))?;

        let sentry = SentryConfig::from_lookup(&lookup)?;

        Ok(Self {
            catalog,
            storage_path,
            currency,
            sentry,
        })
    }
}

impl SentryConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let sample_rate = get_or_default(lookup, "SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| invalid("SENTRY_SAMPLE_RATE", &e))?;
        if !(0.0..=1.0).contains(&sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                format!("must be between 0.0 and 1.0 (got {sample_rate})"),
            ));
        }

        Ok(Self {
            dsn: get_optional(lookup, "SENTRY_DSN"),
            environment: get_optional(lookup, "SENTRY_ENVIRONMENT"),
            sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn invalid(key: &str, error: &impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), error.to_string())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

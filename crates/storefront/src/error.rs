//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends. Errors worth tracking
//! are captured to Sentry (when configured) through [`AppError::capture`].

use thiserror::Error;
use vitrina_core::ProductId;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

impl AppError {
    /// Whether the error points at a broken environment rather than a user
    /// mistake.
    #[must_use]
    pub const fn is_tracked(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Catalog(_))
    }

    /// Log the error and, for tracked errors, send it to Sentry.
    pub fn capture(&self) {
        if self.is_tracked() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::warn!(error = %self, "Command rejected");
        }
    }

    /// Process exit code for the error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ProductNotFound(_) => 2,
            Self::Config(_) => 78,
            _ => 1,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::ProductNotFound(ProductId::new(123));
        assert_eq!(err.to_string(), "Product not found: 123");

        let err = AppError::Storage(StorageError::Poisoned);
        assert_eq!(err.to_string(), "Storage error: Storage lock poisoned");
    }

    #[test]
    fn test_tracked_errors() {
        let status = CatalogError::Status {
            url: "u".to_string(),
            status: 500,
        };
        assert!(AppError::Catalog(status).is_tracked());
        assert!(AppError::Storage(StorageError::Poisoned).is_tracked());
        assert!(!AppError::ProductNotFound(ProductId::new(1)).is_tracked());
        assert!(
            !AppError::Config(ConfigError::InvalidEnvVar("X".to_string(), "bad".to_string()))
                .is_tracked()
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::ProductNotFound(ProductId::new(1)).exit_code(), 2);
        assert_eq!(
            AppError::Config(ConfigError::InvalidEnvVar("X".to_string(), "bad".to_string()))
                .exit_code(),
            78
        );
        assert_eq!(AppError::Storage(StorageError::Poisoned).exit_code(), 1);
    }

    #[test]
    fn test_capture_without_sentry_client() {
        // No client bound: capture only logs.
        AppError::Storage(StorageError::Poisoned).capture();
        add_breadcrumb("cart", "Added product", Some(&[("product_id", "1")]));
    }
}

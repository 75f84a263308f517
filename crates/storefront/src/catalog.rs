//! Product catalog loading.
//!
//! The catalog is a JSON array of products, fetched once at startup either
//! over HTTP or from a local file (`data.json` by default). Loading is the
//! only async operation in the storefront; there is no retry and no caching.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_storefront::catalog::{CatalogLoader, CatalogSource};
//!
//! let loader = CatalogLoader::new(CatalogSource::parse("https://shop.example/data.json"));
//! let catalog = loader.load().await?;
//! for product in catalog.iter() {
//!     println!("{} - {}", product.id, product.name);
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;
use vitrina_core::{Product, ProductId};

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Catalog request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Catalog file could not be read.
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Body was not a JSON array of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// Classify `location`: `http`/`https` URLs are fetched, anything else is
    /// treated as a filesystem path.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(PathBuf::from(location)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The list of purchasable products, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Product with the given ID.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Drop products priced below zero; they cannot be sold.
    fn without_negative_prices(mut self) -> Self {
        self.products.retain(|product| {
            let valid = !product.price.is_sign_negative() || product.price.is_zero();
            if !valid {
                tracing::warn!(
                    product_id = %product.id,
                    price = %product.price,
                    "Skipping catalog product with negative price"
                );
            }
            valid
        });
        self
    }
}

/// Fetches the catalog from a [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    /// Create a loader for `source`.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// Load and parse the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure, non-success status,
    /// unreadable file, or a body that is not a JSON array of products.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load(&self) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = match &self.source {
            CatalogSource::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                let body = response.bytes().await?;
                serde_json::from_slice(&body)?
            }
            CatalogSource::File(path) => {
                let body = tokio::fs::read(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                serde_json::from_slice(&body)?
            }
        };

        let catalog = catalog.without_negative_prices();
        tracing::info!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}

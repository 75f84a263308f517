//! Subcommand implementations.
//!
//! Commands take the cart store, catalog and output sink as arguments so the
//! same code runs against a file-backed store in the binary and an in-memory
//! one in tests.

pub mod cart;
pub mod catalog;

use std::io::Write;

use vitrina_core::CurrencyCode;
use vitrina_storefront::{
    AppError, Catalog, CatalogLoader, CartStore, FileStorage, LoadOutcome, Storage,
    StorefrontConfig,
};

use crate::view;

/// Resources shared by every command.
#[derive(Debug)]
pub struct Context {
    pub config: StorefrontConfig,
}

impl Context {
    #[must_use]
    pub const fn new(config: StorefrontConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.config.currency
    }

    /// Open the saved cart from the configured storage file.
    #[must_use]
    pub fn open_cart(&self) -> CartStore<FileStorage> {
        open_cart(FileStorage::open(&self.config.storage_path))
    }

    /// Open the saved cart with the cart panel re-rendered to stdout after
    /// every change.
    #[must_use]
    pub fn open_cart_with_panel(&self) -> CartStore<FileStorage> {
        let mut store = self.open_cart();
        subscribe_panel(&mut store, self.currency(), std::io::stdout);
        store
    }

    /// Load the catalog. Failures are logged and yield an empty catalog.
    pub async fn load_catalog(&self) -> Catalog {
        let loader = CatalogLoader::new(self.config.catalog.clone());
        match loader.load().await {
            Ok(catalog) => catalog,
            Err(e) => {
                AppError::from(e).capture();
                Catalog::default()
            }
        }
    }
}

/// Construct a store over `storage`, logging how the saved cart was found.
pub fn open_cart<S: Storage>(storage: S) -> CartStore<S> {
    let (store, outcome) = CartStore::load(storage);
    match outcome {
        LoadOutcome::Loaded(lines) => tracing::debug!(lines, "Saved cart restored"),
        LoadOutcome::Empty => tracing::debug!("No saved cart"),
        LoadOutcome::Corrupt(raw) => tracing::warn!(
            bytes = raw.len(),
            "Saved cart is corrupt, starting with an empty cart"
        ),
    }
    store
}

/// Subscribe a renderer that redraws the cart panel into a fresh writer from
/// `sink` after every change.
pub fn subscribe_panel<S, W, F>(store: &mut CartStore<S>, currency: CurrencyCode, sink: F)
where
    S: Storage,
    W: Write,
    F: Fn() -> W + 'static,
{
    store.subscribe(move |_, items| {
        let mut out = sink();
        if let Err(e) = view::render_cart_panel(&mut out, items, currency) {
            tracing::warn!(error = %e, "Failed to render cart panel");
        }
    });
}

//! Vitrina Storefront library.
//!
//! Client-side storefront state: the shopping cart and its persistence, plus
//! the catalog loader and configuration shared by front ends.
//!
//! # Modules
//!
//! - [`cart`] - Cart store, change events, checkout
//! - [`storage`] - Key-value storage backends (memory, JSON file)
//! - [`catalog`] - Product catalog loading over HTTP or from disk
//! - [`config`] - Environment-based configuration
//! - [`error`] - Unified error type with Sentry capture

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod storage;

pub use cart::{CART_STORAGE_KEY, CartEvent, CartStore, LoadOutcome, Receipt, cart_total};
pub use catalog::{Catalog, CatalogLoader, CatalogSource};
pub use config::StorefrontConfig;
pub use error::AppError;
pub use storage::{FileStorage, MemoryStorage, Storage};

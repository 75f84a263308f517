//! Client-side shopping cart.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the ordered list of line items (unique by product ID)
//!   and is the only way to change it
//! - Every mutation writes the whole cart to storage as a JSON array under
//!   [`CART_STORAGE_KEY`]; the saved copy is the source of truth across runs
//! - Front ends observe changes through [`CartStore::subscribe`]
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use vitrina_core::{Product, ProductId};
//! use vitrina_storefront::cart::CartStore;
//! use vitrina_storefront::storage::MemoryStorage;
//!
//! let mut cart = CartStore::new(MemoryStorage::new());
//! let mate = Product {
//!     id: ProductId::new(1),
//!     name: "Mate".to_string(),
//!     price: Decimal::new(100, 0),
//!     image: String::new(),
//!     description: String::new(),
//! };
//!
//! cart.add_product(&mate);
//! cart.add_product(&mate);
//! assert_eq!(cart.compute_total(), Decimal::new(200, 0));
//! ```

mod events;
mod store;

pub use events::{CartEvent, SubscriptionId};
pub use store::{CartStore, LoadOutcome, Receipt, cart_total};

/// Storage key holding the saved cart.
pub const CART_STORAGE_KEY: &str = "carrito";

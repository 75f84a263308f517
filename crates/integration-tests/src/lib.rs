//! Integration tests for Vitrina.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrina-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart stores sharing one storage across reloads
//! - `catalog_loading` - Catalog over HTTP and from disk feeding the cart
//!
//! This library holds the fixtures shared by the test files.

use rust_decimal::Decimal;
use vitrina_core::{Product, ProductId};

/// Catalog in the `data.json` shape served by the storefront.
pub const CATALOG_JSON: &str = r#"[
    {"id": 1, "name": "Mate imperial", "price": 12500, "image": "img/mate.jpg", "description": "Calabaza forrada en cuero"},
    {"id": 2, "name": "Bombilla pico de loro", "price": 4300.5, "image": "img/bombilla.jpg", "description": "Alpaca"},
    {"id": 3, "name": "Yerba 1kg", "price": 3200, "image": "img/yerba.jpg", "description": "Con palo"}
]"#;

/// Build a product with the given ID and whole-unit price.
#[must_use]
pub fn product(id: i32, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Producto {id}"),
        price: Decimal::new(price, 0),
        image: format!("img/{id}.jpg"),
        description: String::new(),
    }
}

//! Cart commands.
//!
//! Mutating commands only change the store; the cart panel is redrawn by the
//! renderer subscribed in [`super::Context::open_cart_with_panel`].

use std::io::Write;

use tracing::instrument;
use vitrina_core::{CurrencyCode, ProductId};
use vitrina_storefront::error::{Result, add_breadcrumb};
use vitrina_storefront::{AppError, Catalog, CartStore, Storage};

use crate::view;

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns `AppError::ProductNotFound` if `id` is not in the catalog.
#[instrument(skip(store, catalog, out))]
pub fn add<S: Storage>(
    store: &mut CartStore<S>,
    catalog: &Catalog,
    id: ProductId,
    out: &mut impl Write,
) -> Result<()> {
    let product = catalog.find(id).ok_or(AppError::ProductNotFound(id))?;
    let product_id = id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));

    store.add_product(product);
    view::render_added(out, product)?;
    Ok(())
}

/// Change the quantity of a cart line by `delta`.
#[instrument(skip(store))]
pub fn change_quantity<S: Storage>(store: &mut CartStore<S>, id: ProductId, delta: i64) {
    let (product_id, delta_str) = (id.to_string(), delta.to_string());
    add_breadcrumb(
        "cart",
        "Changed quantity",
        Some(&[("product_id", product_id.as_str()), ("delta", delta_str.as_str())]),
    );
    if store.get(id).is_none() {
        tracing::info!("Product is not in the cart");
    }
    store.change_quantity(id, delta);
}

/// Remove a cart line.
#[instrument(skip(store))]
pub fn remove<S: Storage>(store: &mut CartStore<S>, id: ProductId) {
    let product_id = id.to_string();
    add_breadcrumb("cart", "Removed product", Some(&[("product_id", product_id.as_str())]));
    store.remove_product(id);
}

/// Print the cart panel.
///
/// # Errors
///
/// Returns `AppError::Io` if the output cannot be written.
pub fn show<S: Storage>(
    store: &CartStore<S>,
    currency: CurrencyCode,
    out: &mut impl Write,
) -> Result<()> {
    view::render_cart_panel(out, store.items(), currency)?;
    Ok(())
}

/// Finalize the purchase and empty the cart.
///
/// # Errors
///
/// Returns `AppError::Io` if the output cannot be written.
#[instrument(skip(store, out))]
pub fn checkout<S: Storage>(
    store: &mut CartStore<S>,
    currency: CurrencyCode,
    out: &mut impl Write,
) -> Result<()> {
    match store.checkout() {
        Some(receipt) => {
            add_breadcrumb("cart", "Checked out", None);
            view::render_receipt(out, &receipt, currency)?;
        }
        None => writeln!(out, "{}", view::EMPTY_CART_MESSAGE)?,
    }
    Ok(())
}

/// Empty the cart without purchasing.
#[instrument(skip(store))]
pub fn clear<S: Storage>(store: &mut CartStore<S>) {
    add_breadcrumb("cart", "Cleared cart", None);
    store.clear();
}

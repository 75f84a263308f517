//! Catalog browsing commands.

use std::io::Write;

use vitrina_core::{CurrencyCode, ProductId};
use vitrina_storefront::error::Result;
use vitrina_storefront::{AppError, Catalog};

use crate::view;

/// List every product.
///
/// # Errors
///
/// Returns `AppError::Io` if the output cannot be written.
pub fn products(catalog: &Catalog, currency: CurrencyCode, out: &mut impl Write) -> Result<()> {
    view::render_product_grid(out, catalog, currency)?;
    Ok(())
}

/// Show the details of one product.
///
/// # Errors
///
/// Returns `AppError::ProductNotFound` if `id` is not in the catalog.
pub fn show(
    catalog: &Catalog,
    id: ProductId,
    currency: CurrencyCode,
    out: &mut impl Write,
) -> Result<()> {
    let product = catalog.find(id).ok_or(AppError::ProductNotFound(id))?;
    view::render_product_details(out, product, currency)?;
    Ok(())
}

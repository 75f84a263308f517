//! Plain-text rendering of the catalog and the cart panel.
//!
//! Every function writes to any `io::Write`, so commands pass a locked stdout
//! and tests pass a `Vec<u8>`.

use std::io::{self, Write};

use vitrina_core::{CartLineItem, CurrencyCode, Price, Product};
use vitrina_storefront::{Catalog, Receipt, cart_total};

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Product grid: one row per product.
pub fn render_product_grid(
    out: &mut impl Write,
    catalog: &Catalog,
    currency: CurrencyCode,
) -> io::Result<()> {
    if catalog.is_empty() {
        return writeln!(out, "No products available.");
    }

    for product in catalog.iter() {
        writeln!(
            out,
            "[{:>3}] {:<32} {:>14}",
            product.id.as_i32(),
            product.name,
            product.price_in(currency).display()
        )?;
    }
    Ok(())
}

/// Product detail view.
pub fn render_product_details(
    out: &mut impl Write,
    product: &Product,
    currency: CurrencyCode,
) -> io::Result<()> {
    writeln!(out, "{}", product.name)?;
    if !product.image.is_empty() {
        writeln!(out, "Image: {}", product.image)?;
    }
    if !product.description.is_empty() {
        writeln!(out, "{}", product.description)?;
    }
    writeln!(out, "Price: {}", product.price_in(currency).display())
}

/// Confirmation shown after adding a product.
pub fn render_added(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(out, "✔ {} added to cart", product.name)
}

/// Cart panel: lines as `name - price x quantity`, then the total.
pub fn render_cart_panel(
    out: &mut impl Write,
    items: &[CartLineItem],
    currency: CurrencyCode,
) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "{EMPTY_CART_MESSAGE}");
    }

    for item in items {
        writeln!(
            out,
            "{} - {} x {}",
            item.product.name,
            item.product.price_in(currency).display(),
            item.quantity
        )?;
    }

    writeln!(out, "Total: {}", Price::new(cart_total(items), currency).display())
}

/// Message shown after a successful checkout.
pub fn render_receipt(
    out: &mut impl Write,
    receipt: &Receipt,
    currency: CurrencyCode,
) -> io::Result<()> {
    writeln!(
        out,
        "Purchase completed! {} item(s), total: {}",
        receipt.item_count,
        Price::new(receipt.total, currency).display()
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use vitrina_core::ProductId;

    use super::*;

    fn product(id: i32, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(price, 0),
            image: format!("img/{id}.jpg"),
            description: format!("{name} description"),
        }
    }

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_cart_panel() {
        let text = rendered(|out| render_cart_panel(out, &[], CurrencyCode::ARS));
        assert_eq!(text, "Your cart is empty.\n");
    }

    #[test]
    fn test_cart_panel_lines_and_total() {
        let items = vec![
            CartLineItem {
                product: product(1, "Mate", 1500),
                quantity: 2,
            },
            CartLineItem::new(product(2, "Yerba", 800)),
        ];

        let text = rendered(|out| render_cart_panel(out, &items, CurrencyCode::ARS));
        assert_eq!(
            text,
            "Mate - $ 1.500,00 x 2\nYerba - $ 800,00 x 1\nTotal: $ 3.800,00\n"
        );
    }

    #[test]
    fn test_product_grid() {
        let catalog = Catalog::new(vec![product(1, "Mate", 100), product(2, "Yerba", 45)]);
        let text = rendered(|out| render_product_grid(out, &catalog, CurrencyCode::ARS));

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[  1] Mate"));
        assert!(lines[1].ends_with("$ 45,00"));
    }

    #[test]
    fn test_empty_product_grid() {
        let text = rendered(|out| render_product_grid(out, &Catalog::default(), CurrencyCode::ARS));
        assert_eq!(text, "No products available.\n");
    }

    #[test]
    fn test_product_details() {
        let text = rendered(|out| {
            render_product_details(out, &product(3, "Bombilla", 2500), CurrencyCode::ARS)
        });
        assert!(text.contains("Bombilla description"));
        assert!(text.contains("Image: img/3.jpg"));
        assert!(text.ends_with("Price: $ 2.500,00\n"));
    }

    #[test]
    fn test_receipt() {
        let receipt = Receipt {
            items: Vec::new(),
            total: Decimal::new(3800, 0),
            item_count: 3,
        };
        let text = rendered(|out| render_receipt(out, &receipt, CurrencyCode::ARS));
        assert_eq!(text, "Purchase completed! 3 item(s), total: $ 3.800,00\n");
    }
}

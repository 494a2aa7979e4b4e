use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::Product;

/// One ledger entry. `unit_price` is the effective price snapshotted when the
/// product was first added; later catalog price changes do not reprice it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

/// Ordered product-id → line ledger. Serialized as a whole into the
/// key-value store, so the stored blob is exactly this shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct line count, used for the cart badge. NOT total units.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Adds `quantity` units of `product`. An already-present product gets its
    /// quantity incremented; otherwise a new line is appended with the current
    /// effective unit price. Returns the updated distinct line count.
    pub fn add(&mut self, product: &Product, quantity: i32) -> usize {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += quantity;
        } else {
            self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                image_url: product.image_url.clone(),
                unit_price: product.effective_price().clone(),
                quantity,
            });
        }
        self.lines.len()
    }

    /// Sets the quantity of a line. A quantity of zero or less removes the
    /// line; a line is never stored with a non-positive quantity.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Removes the line if present; removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn subtotal(&self) -> BigDecimal {
        self.lines.iter().fold(BigDecimal::from(0), |acc, line| {
            acc + &line.unit_price * BigDecimal::from(line.quantity)
        })
    }

    /// Flat fee applied to any non-empty cart; an empty cart ships for free
    /// because there is nothing to ship.
    pub fn shipping(&self, fee: &BigDecimal) -> BigDecimal {
        if self.subtotal() > BigDecimal::from(0) {
            fee.clone()
        } else {
            BigDecimal::from(0)
        }
    }

    pub fn total(&self, fee: &BigDecimal, discount: &BigDecimal) -> BigDecimal {
        self.subtotal() + self.shipping(fee) - discount
    }
}

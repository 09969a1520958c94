//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, unique by product id,
//! where every line has a quantity of at least one. Totals are derived on
//! every read and never stored.
//!
//! Each mutating operation returns whether the cart changed so an owner can
//! decide whether to notify its subscribers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::catalog::Product;
use crate::types::id::ProductId;
use crate::types::price::Price;

/// One product-and-quantity entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub images: Vec<String>,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            images: product.images.clone(),
            quantity: 1,
        }
    }

    /// Unit price in the storefront currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::usd(self.price * Decimal::from(self.quantity))
    }

    /// First image, used for thumbnails.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        Price::usd(
            self.lines
                .iter()
                .map(|line| line.price * Decimal::from(line.quantity))
                .sum(),
        )
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line for `product.id`, or appends a new line
    /// with quantity 1. Returns the line's quantity after the operation.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            line.quantity
        } else {
            self.lines.push(CartLine::from_product(product));
            1
        }
    }

    /// Remove the line for a product. Returns false if there was none.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Missing lines are left alone.
    /// Returns true if the cart changed.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id);
        }
        match self.lines.iter_mut().find(|line| line.id == id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Add one to an existing line.
    pub fn increment(&mut self, id: ProductId) -> bool {
        match self.line(id) {
            Some(line) => {
                let next = line.quantity.saturating_add(1);
                self.set_quantity(id, next)
            }
            None => false,
        }
    }

    /// Take one from an existing line, removing it when it would drop below one.
    pub fn decrement(&mut self, id: ProductId) -> bool {
        match self.line(id) {
            Some(line) if line.quantity > 1 => {
                let next = line.quantity - 1;
                self.set_quantity(id, next)
            }
            Some(_) => self.remove(id),
            None => false,
        }
    }

    /// Remove every line. Returns true if the cart was not already empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }
}

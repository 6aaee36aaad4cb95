use rust_decimal::Decimal;

use crate::api::Product;

/// Client-side cart. Lives only for the current run and is never sent to
/// the server; every add appends a line, duplicates included.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        self.lines.push(product);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Product] {
        &self.lines
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|p| p.price).sum()
    }
}

//! Selection
//!
//! The simpler, quantity-free checkout model used by the storefront home
//! page: whole product snapshots are toggled in and out of a set. The
//! quantity-aware [`crate::cart::Cart`] is the primary model; this one is
//! kept for the pick-then-checkout flow.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::products::{Product, ProductId};

/// Insertion-ordered set of selected products, unique by product id.
#[derive(Debug, Default)]
pub struct SelectionSet {
    products: Vec<Product>,
    index: FxHashSet<ProductId>,
}

impl SelectionSet {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership for a product.
    ///
    /// Present → removed, absent → added. Callers never choose a direction,
    /// so toggling twice deliberately restores the prior state.
    pub fn toggle(&mut self, product: &Product) {
        if self.index.remove(&product.id) {
            self.products.retain(|p| p.id != product.id);
        } else {
            self.index.insert(product.id.clone());
            self.products.push(product.clone());
        }
    }

    /// O(1) membership test.
    pub fn is_selected(&self, product_id: &ProductId) -> bool {
        self.index.contains(product_id)
    }

    /// Sum of selected product prices.
    pub fn total(&self) -> Decimal {
        self.products.iter().map(|p| p.price).sum()
    }

    /// Empty the selection, used after checkout handoff.
    pub fn clear(&mut self) {
        self.products.clear();
        self.index.clear();
    }

    /// Selected products in toggle order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of selected products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, name: &str, price_minor: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(price_minor, 2),
            image: String::new(),
            category: "roupas".to_string(),
            size: None,
            brand: None,
            stock: None,
            featured: None,
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();
        let shirt = product("p1", "Camisa", 5990);

        selection.toggle(&shirt);
        assert!(selection.is_selected(&shirt.id));

        selection.toggle(&shirt);
        assert!(!selection.is_selected(&shirt.id));
        assert!(selection.is_empty());
    }

    #[test]
    fn double_toggle_restores_total() {
        let mut selection = SelectionSet::new();
        let shirt = product("p1", "Camisa", 5990);
        let shorts = product("p2", "Bermuda", 7990);

        selection.toggle(&shirt);
        let before = selection.total();

        selection.toggle(&shorts);
        selection.toggle(&shorts);

        assert_eq!(selection.total(), before);
    }

    #[test]
    fn total_sums_selected_prices() {
        let mut selection = SelectionSet::new();

        selection.toggle(&product("p1", "Camisa", 5990));
        selection.toggle(&product("p2", "Bermuda", 7990));

        assert_eq!(selection.total(), Decimal::new(13980, 2));
    }

    #[test]
    fn toggle_order_is_preserved() {
        let mut selection = SelectionSet::new();

        selection.toggle(&product("p2", "Bermuda", 7990));
        selection.toggle(&product("p1", "Camisa", 5990));

        let names: Vec<&str> = selection.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bermuda", "Camisa"]);
    }

    #[test]
    fn clear_empties_set_and_index() {
        let mut selection = SelectionSet::new();
        let shirt = product("p1", "Camisa", 5990);

        selection.toggle(&shirt);
        selection.clear();

        assert!(selection.is_empty());
        assert!(!selection.is_selected(&shirt.id));
        assert_eq!(selection.total(), Decimal::ZERO);
    }
}

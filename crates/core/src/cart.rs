//! Cart
//!
//! The quantity-aware cart store. Line items are insertion-ordered and
//! unique per product id; adding a product that is already present merges
//! into the existing line instead of duplicating it. Aggregates are derived
//! fresh on every call. Subscribers are plain closures invoked synchronously
//! after each mutation, before the mutating call returns — the cart is
//! constructed by whoever owns a surface and handed around explicitly, not
//! kept in an ambient singleton.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors for cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A non-positive quantity was passed to `add_item`.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// A cart entry: one product plus a quantity.
///
/// Display fields are denormalized copies taken at add time; later edits to
/// the source product do not reach lines already in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub size: Option<String>,
    pub brand: Option<String>,
    pub quantity: u32,
}

impl LineItem {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            size: product.size.clone(),
            brand: product.brand.clone(),
            quantity,
        }
    }

    /// Price × quantity for this line.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

type Subscriber = Box<dyn FnMut(&Cart)>;

/// Cart store with synchronous change notification.
#[derive(Default)]
pub struct Cart {
    items: SmallVec<[LineItem; 8]>,
    is_open: bool,
    subscribers: Vec<Subscriber>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is zero; the
    /// cart is left untouched and no notification is sent.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            Some(line) => line.quantity += quantity,
            None => self.items.push(LineItem::from_product(product, quantity)),
        }

        self.notify();

        Ok(())
    }

    /// Remove the line for `product_id`, if present. Idempotent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.items.retain(|line| line.product_id != *product_id);
        self.notify();
    }

    /// Set a line's quantity exactly.
    ///
    /// Zero behaves like [`Cart::remove_item`]; an unknown product id is a
    /// no-op (subscribers are still notified, matching remove).
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == *product_id)
        {
            line.quantity = quantity;
        }

        self.notify();
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify();
    }

    /// Sum of quantities across all lines, recomputed on each call.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price × quantity across all lines, recomputed on each call.
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Lines in add order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// UI visibility flag co-located with the cart.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Toggle the visibility flag. Line data is unaffected.
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
        self.notify();
    }

    /// Register a change observer.
    ///
    /// Observers run synchronously after every mutating operation, in
    /// registration order, with no batching across operations.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Cart) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&mut self) {
        // Subscribers get a shared view of the cart, so the list is taken
        // out for the duration of the walk.
        let mut subscribers = std::mem::take(&mut self.subscribers);

        for subscriber in &mut subscribers {
            subscriber(&*self);
        }

        subscribers.append(&mut self.subscribers);
        self.subscribers = subscribers;
    }
}

impl Debug for Cart {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("is_open", &self.is_open)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, name: &str, price_minor: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(price_minor, 2),
            image: format!("https://cdn.example/{id}.jpg"),
            category: "calcados".to_string(),
            size: None,
            brand: None,
            stock: None,
            featured: None,
        }
    }

    #[test]
    fn adding_same_product_merges_quantities() -> TestResult {
        let mut cart = Cart::new();
        let shoe = product("p1", "Tênis", 19990);

        cart.add_item(&shoe, 1)?;
        cart.add_item(&shoe, 2)?;
        cart.add_item(&shoe, 3)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 6);

        Ok(())
    }

    #[test]
    fn zero_quantity_add_is_rejected_and_leaves_cart_untouched() {
        let mut cart = Cart::new();
        let shoe = product("p1", "Tênis", 19990);

        let result = cart.add_item(&shoe, 0);

        assert_eq!(result, Err(CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn lines_keep_add_order() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&product("p2", "Meia", 990), 1)?;
        cart.add_item(&product("p1", "Tênis", 19990), 1)?;
        cart.add_item(&product("p3", "Boné", 4990), 1)?;

        let names: Vec<&str> = cart.items().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Meia", "Tênis", "Boné"]);

        Ok(())
    }

    #[test]
    fn update_quantity_sets_exactly_not_additively() -> TestResult {
        let mut cart = Cart::new();
        let shoe = product("p1", "Tênis", 19990);

        cart.add_item(&shoe, 5)?;
        cart.update_quantity(&shoe.id, 2);

        assert_eq!(cart.items()[0].quantity, 2);

        Ok(())
    }

    #[test]
    fn update_quantity_zero_equals_remove() -> TestResult {
        let shoe = product("p1", "Tênis", 19990);
        let sock = product("p2", "Meia", 990);

        let mut removed = Cart::new();
        removed.add_item(&shoe, 2)?;
        removed.add_item(&sock, 1)?;
        removed.remove_item(&shoe.id);

        let updated = {
            let mut cart = Cart::new();
            cart.add_item(&shoe, 2)?;
            cart.add_item(&sock, 1)?;
            cart.update_quantity(&shoe.id, 0);
            cart
        };

        assert_eq!(removed.items(), updated.items());

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_product_is_a_no_op() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", "Tênis", 19990), 1)?;

        cart.update_quantity(&ProductId::from("missing"), 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);

        Ok(())
    }

    #[test]
    fn remove_absent_product_is_idempotent() {
        let mut cart = Cart::new();

        cart.remove_item(&ProductId::from("missing"));

        assert!(cart.is_empty());
    }

    #[test]
    fn totals_track_interleaved_mutations() -> TestResult {
        let mut cart = Cart::new();
        let shoe = product("p1", "Tênis", 19990);
        let sock = product("p2", "Meia", 990);

        cart.add_item(&shoe, 2)?;
        cart.add_item(&sock, 3)?;
        cart.update_quantity(&sock.id, 1);
        cart.remove_item(&shoe.id);
        cart.add_item(&shoe, 1)?;

        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Decimal::new(20980, 2));

        Ok(())
    }

    #[test]
    fn clear_empties_everything() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", "Tênis", 19990), 2)?;

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn subscribers_run_synchronously_on_every_mutation() -> TestResult {
        let mut cart = Cart::new();
        let calls = Rc::new(Cell::new(0_u32));

        let observed = Rc::clone(&calls);
        cart.subscribe(move |_| observed.set(observed.get() + 1));

        cart.add_item(&product("p1", "Tênis", 19990), 1)?; // 1
        cart.update_quantity(&ProductId::from("p1"), 4); // 2
        cart.remove_item(&ProductId::from("p1")); // 3
        cart.clear(); // 4
        cart.set_open(true); // 5

        assert_eq!(calls.get(), 5);

        Ok(())
    }

    #[test]
    fn subscriber_sees_state_after_the_mutation() -> TestResult {
        let mut cart = Cart::new();
        let seen_total = Rc::new(Cell::new(0_u64));

        let observed = Rc::clone(&seen_total);
        cart.subscribe(move |cart| observed.set(cart.total_items()));

        cart.add_item(&product("p1", "Tênis", 19990), 3)?;

        assert_eq!(seen_total.get(), 3);

        Ok(())
    }

    #[test]
    fn visibility_toggle_does_not_touch_lines() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", "Tênis", 19990), 2)?;

        cart.set_open(true);
        cart.set_open(false);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert!(!cart.is_open());

        Ok(())
    }
}

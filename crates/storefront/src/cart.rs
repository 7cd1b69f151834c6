//! Shopping cart store.
//!
//! An ordered list of cart lines with derived totals. Every mutation writes
//! the full line list through to the key-value store immediately, so an
//! external reader of the persisted record always sees the post-mutation
//! state.

use std::sync::RwLock;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::{CartLine, Product};
use crate::storage::LocalStore;
use crate::validation::{MAX_LINE_QUANTITY, validate_cart_line};

/// Storage key for the persisted line list.
pub const CART_KEY: &str = "teahouse_cart";

/// Errors surfaced by cart mutations.
///
/// These are business-rule violations the caller must show to the shopper;
/// they never indicate an internal failure.
#[derive(Debug, Error)]
pub enum CartError {
    /// A quantity ceiling would be exceeded.
    #[error("quantity must not exceed {limit} for a single product")]
    QuantityLimit { limit: u32 },

    /// The synthesized line failed validation.
    #[error("invalid cart line: {0}")]
    InvalidLine(String),
}

/// The shopping cart.
pub struct CartStore {
    store: LocalStore,
    lines: RwLock<Vec<CartLine>>,
}

impl CartStore {
    /// Create a cart store, restoring any persisted lines.
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        let lines = store.get_or(CART_KEY, Vec::new());
        Self {
            store,
            lines: RwLock::new(lines),
        }
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.read().clone()
    }

    /// Add `quantity` units of `product` as an uncustomized line.
    ///
    /// Merges into an existing uncustomized line for the same product when
    /// one exists. The cart is left untouched on any rejection.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidLine`] when the synthesized line fails
    /// validation, and [`CartError::QuantityLimit`] when the merged
    /// quantity would exceed the per-product ceiling.
    pub fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if let Some(message) = validate_cart_line(
            product.id.as_str(),
            &product.name,
            product.price.amount(),
            quantity,
        ) {
            return Err(CartError::InvalidLine(message));
        }

        let mut lines = self.write();
        if let Some(existing) = lines
            .iter_mut()
            .find(|line| line.id == product.id && !line.is_customized())
        {
            let merged = existing.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CartError::QuantityLimit {
                    limit: MAX_LINE_QUANTITY,
                });
            }
            existing.quantity = merged;
        } else {
            lines.push(CartLine::simple(product, quantity));
        }

        self.store.set(CART_KEY, &*lines);
        debug!(product = %product.id, quantity, "added to cart");
        Ok(())
    }

    /// Append a fully built customized line.
    ///
    /// Customized lines are never merged - not with each other and not with
    /// uncustomized lines, even when their topping sets are equal. The
    /// caller constructed the line (including its synthetic id) and owns
    /// its identity.
    pub fn add_to_cart_with_toppings(&self, line: CartLine) {
        let mut lines = self.write();
        debug!(line = %line.cart_id, "added customized line");
        lines.push(line);
        self.store.set(CART_KEY, &*lines);
    }

    /// Remove the first line whose line id or product id matches.
    ///
    /// A no-op when nothing matches.
    pub fn remove_from_cart(&self, id: &str) {
        let mut lines = self.write();
        if let Some(index) = lines
            .iter()
            .position(|line| line.cart_id.as_str() == id || line.id.as_str() == id)
        {
            lines.remove(index);
            self.store.set(CART_KEY, &*lines);
            debug!(id, "removed from cart");
        }
    }

    /// Set the quantity of a matching line; a quantity of zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityLimit`] when the new quantity exceeds
    /// the per-line ceiling.
    pub fn update_quantity(&self, id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_from_cart(id);
            return Ok(());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityLimit {
                limit: MAX_LINE_QUANTITY,
            });
        }

        let mut lines = self.write();
        if let Some(line) = lines
            .iter_mut()
            .find(|line| line.cart_id.as_str() == id || line.id.as_str() == id)
        {
            line.quantity = quantity;
            self.store.set(CART_KEY, &*lines);
        }
        Ok(())
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        let mut lines = self.write();
        lines.clear();
        self.store.set(CART_KEY, &*lines);
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.read().iter().map(|line| line.quantity).sum()
    }

    /// Total price: each line's effective unit price times its quantity.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.read()
            .iter()
            .map(|line| line.unit_price() * Decimal::from(line.quantity))
            .sum()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<CartLine>> {
        self.lines
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<CartLine>> {
        self.lines
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use teahouse_core::{LineId, Price, ProductId, ToppingId};

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            slug: format!("slug-{id}"),
            name: format!("Product {id}"),
            description: "test".to_string(),
            price: Price::new(price).unwrap(),
            image: "/img.jpg".to_string(),
            featured: false,
        }
    }

    fn customized_line(product: &Product, suffix: &str) -> CartLine {
        let mut line = CartLine::simple(product, 1);
        line.cart_id = LineId::new(format!("{}_custom_{suffix}", product.id));
        line.selected_toppings = vec![ToppingId::new("t1")];
        line.toppings_price = dec!(7000);
        line.total_price = Some(Price::new(product.price.amount() + dec!(7000)).unwrap());
        line
    }

    fn cart() -> (tempfile::TempDir, CartStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (dir, CartStore::new(store))
    }

    #[test]
    fn test_add_merges_uncustomized_lines() {
        let (_dir, cart) = cart();
        let p = product("p1", dec!(45000));
        cart.add_to_cart(&p, 3).unwrap();
        cart.add_to_cart(&p, 4).unwrap();

        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 7);
    }

    #[test]
    fn test_add_rejects_merge_past_ceiling() {
        let (_dir, cart) = cart();
        let p = product("p1", dec!(45000));
        cart.add_to_cart(&p, 6).unwrap();
        let err = cart.add_to_cart(&p, 5).unwrap_err();
        assert!(matches!(err, CartError::QuantityLimit { limit: 10 }));

        // the rejection left the stored quantity unchanged
        assert_eq!(cart.lines()[0].quantity, 6);
    }

    #[test]
    fn test_add_rejects_quantity_over_ceiling() {
        let (_dir, cart) = cart();
        let p = product("p1", dec!(45000));
        assert!(cart.add_to_cart(&p, 11).is_err());
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let (_dir, cart) = cart();
        let p = product("p1", dec!(45000));
        assert!(matches!(
            cart.add_to_cart(&p, 0),
            Err(CartError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_customized_lines_never_merge() {
        let (_dir, cart) = cart();
        let p = product("p1", dec!(45000));
        cart.add_to_cart_with_toppings(customized_line(&p, "a"));
        cart.add_to_cart_with_toppings(customized_line(&p, "b"));

        // identical topping selections still yield two distinct lines
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_customized_line_does_not_merge_with_simple() {
        let (_dir, cart) = cart();
        let p = product("p1", dec!(45000));
        cart.add_to_cart(&p, 2).unwrap();
        cart.add_to_cart_with_toppings(customized_line(&p, "a"));
        cart.add_to_cart(&p, 1).unwrap();

        let lines = cart.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 3);
    }

    #[test]
    fn test_total_price_uses_customized_unit_price() {
        let (_dir, cart) = cart();
        cart.add_to_cart(&product("p1", dec!(50)), 2).unwrap();

        let p2 = product("p2", dec!(30));
        let mut line = CartLine::simple(&p2, 1);
        line.cart_id = LineId::new("p2_custom_x");
        line.selected_toppings = vec![ToppingId::new("t1")];
        line.toppings_price = dec!(5);
        line.total_price = Some(Price::new(dec!(35)).unwrap());
        cart.add_to_cart_with_toppings(line);

        assert_eq!(cart.total_price(), dec!(135));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (_dir, cart) = cart();
        cart.add_to_cart(&product("p1", dec!(45000)), 1).unwrap();
        cart.remove_from_cart("missing");
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_by_line_id_and_product_id() {
        let (_dir, cart) = cart();
        let p = product("p1", dec!(45000));
        cart.add_to_cart(&p, 1).unwrap();
        let line_id = cart.lines()[0].cart_id.clone();
        cart.remove_from_cart(line_id.as_str());
        assert!(cart.lines().is_empty());

        cart.add_to_cart(&p, 1).unwrap();
        cart.remove_from_cart("p1");
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let (_dir, cart) = cart();
        cart.add_to_cart(&product("p1", dec!(45000)), 2).unwrap();
        cart.update_quantity("p1", 0).unwrap();
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let (_dir, cart) = cart();
        cart.add_to_cart(&product("p1", dec!(45000)), 2).unwrap();
        cart.update_quantity("p1", 9).unwrap();
        assert_eq!(cart.lines()[0].quantity, 9);
        assert!(cart.update_quantity("p1", 11).is_err());
    }

    #[test]
    fn test_clear_cart() {
        let (_dir, cart) = cart();
        cart.add_to_cart(&product("p1", dec!(45000)), 2).unwrap();
        cart.clear_cart();
        assert!(cart.lines().is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_mutations_write_through() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        let cart = CartStore::new(store.clone());
        cart.add_to_cart(&product("p1", dec!(45000)), 2).unwrap();

        // a fresh store instance over the same directory sees the lines
        let reloaded = CartStore::new(store);
        assert_eq!(reloaded.lines().len(), 1);
        assert_eq!(reloaded.lines()[0].quantity, 2);
    }
}

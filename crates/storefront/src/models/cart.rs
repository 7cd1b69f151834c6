//! Cart line items.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use teahouse_core::{LineId, Price, ProductId, ToppingId};

use super::catalog::Product;

/// One entry in the cart: a product configuration plus a quantity.
///
/// The name and price are denormalized snapshots taken when the line was
/// created; a later catalog reload does not touch existing lines. `cart_id`
/// is a synthetic identifier so that two lines for the same product with
/// different customizations stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Synthetic line identifier.
    pub cart_id: LineId,
    /// The product this line was created from.
    pub id: ProductId,
    pub name: String,
    /// Base unit price snapshot.
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub selected_toppings: Vec<ToppingId>,
    /// Combined price of the selected toppings.
    #[serde(default)]
    pub toppings_price: Decimal,
    /// Customized unit price (base plus toppings); absent for plain lines.
    #[serde(default)]
    pub total_price: Option<Price>,
}

impl CartLine {
    /// Build an uncustomized line for `product`.
    ///
    /// The line id combines the product id, a `simple` marker, and the
    /// creation timestamp, mirroring the persisted wire format.
    #[must_use]
    pub fn simple(product: &Product, quantity: u32) -> Self {
        let cart_id = LineId::new(format!(
            "{}_simple_{}",
            product.id,
            Utc::now().timestamp_millis()
        ));
        Self {
            cart_id,
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            selected_toppings: Vec::new(),
            toppings_price: Decimal::ZERO,
            total_price: Some(product.price),
        }
    }

    /// Whether this line carries customizations.
    ///
    /// Customized lines are never merged, even when their topping sets are
    /// equal; the caller that built them owns their identity.
    #[must_use]
    pub fn is_customized(&self) -> bool {
        !self.selected_toppings.is_empty()
    }

    /// The effective unit price: the customized total when present, else
    /// the base price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.total_price.as_ref().map_or(self.price.amount(), Price::amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use teahouse_core::Price;

    fn product() -> Product {
        Product {
            id: ProductId::new("p1"),
            slug: "thai-tea".to_string(),
            name: "Thai Tea".to_string(),
            description: "Signature".to_string(),
            price: Price::new(dec!(45000)).unwrap(),
            image: "/images/thai.jpg".to_string(),
            featured: true,
        }
    }

    #[test]
    fn test_simple_line_id_shape() {
        let line = CartLine::simple(&product(), 2);
        assert!(line.cart_id.as_str().starts_with("p1_simple_"));
        assert_eq!(line.quantity, 2);
        assert!(!line.is_customized());
    }

    #[test]
    fn test_unit_price_prefers_total() {
        let mut line = CartLine::simple(&product(), 1);
        assert_eq!(line.unit_price(), dec!(45000));

        line.selected_toppings = vec![ToppingId::new("t1")];
        line.toppings_price = dec!(5000);
        line.total_price = Some(Price::new(dec!(50000)).unwrap());
        assert_eq!(line.unit_price(), dec!(50000));
        assert!(line.is_customized());
    }

    #[test]
    fn test_wire_format_roundtrip() {
        let line = CartLine::simple(&product(), 3);
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"cartId\""));
        assert!(json.contains("\"selectedToppings\""));
        let back: CartLine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}

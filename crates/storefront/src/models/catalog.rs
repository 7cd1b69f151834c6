//! Catalog records: products, toppings, drink options, banners.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use teahouse_core::{Price, ProductId, ToppingId};

/// A catalog product.
///
/// Immutable once loaded; the catalog store replaces the whole collection
/// on reload rather than patching entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// URL key, unique within the catalog.
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Image reference (path or URL).
    pub image: String,
    #[serde(default)]
    pub featured: bool,
}

/// A topping that can be added to a drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topping {
    pub id: ToppingId,
    pub name: String,
    pub price: Price,
}

/// Which customization axis an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Size,
    Ice,
    Sugar,
}

impl OptionKind {
    /// The `type` query-string value for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Ice => "ice",
            Self::Sugar => "sugar",
        }
    }
}

/// A configurable drink option (size, ice level, sugar level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    /// Surcharge relative to the base price; zero for most options.
    #[serde(default)]
    pub price: Decimal,
}

/// A homepage banner image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerImage {
    pub id: String,
    pub src: String,
}

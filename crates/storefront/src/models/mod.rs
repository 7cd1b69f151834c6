//! Data contracts exchanged between the stores and the backend API.
//!
//! Field names serialize in camelCase to match the JSON wire format and the
//! persisted records.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use cart::CartLine;
pub use catalog::{BannerImage, OptionItem, OptionKind, Product, Topping};
pub use order::{Order, OrderCustomer, OrderDraft};
pub use user::{UserAccount, UserProfile};

//! Data models for the food-ordering backend.
//!
//! - `Identity`, `AuthResponse`: the logged-in user and the auth payload
//! - `Category`, `Item`, `CategoryFilter`: the menu
//! - `Cart`, `CartLine`: the current cart and its total
//! - `Order`, `OrderLine`, `OrderStatus`: order history
//! - `Money`: exact prices in cents

pub mod cart;
pub mod catalog;
pub mod money;
pub mod order;
pub mod user;

pub use cart::{AddToCart, Cart, CartLine, ProductSummary};
pub use catalog::{Category, CategoryFilter, Item};
pub use money::Money;
pub use order::{Order, OrderLine, OrderStatus};
pub use user::{AuthResponse, Credentials, Identity};

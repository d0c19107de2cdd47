//! Domain models for the API.
//!
//! These are validated domain objects, separate from the `FromRow` types in
//! [`crate::db`]. All of them serialize straight into response bodies.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use cart::{Cart, CartItem, CartProduct};
pub use catalog::{Category, CategorySummary, Product, ProductImage, SearchHit};
pub use order::{Order, OrderItem};
pub use user::{CurrentUser, User};

//! Business logic between the route handlers and the repositories.

pub mod auth;
pub mod catalog;
pub mod shopping;
pub mod users;

pub use auth::{AuthError, AuthService, TokenIssuer};
pub use catalog::{CatalogError, CatalogService};
pub use shopping::{CartService, OrderService, ShoppingError};
pub use users::UserService;

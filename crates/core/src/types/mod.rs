//! Domain types shared across the Bazaar crates.

pub mod email;
pub mod id;
pub mod pagination;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use pagination::{PageMeta, Pagination};
pub use status::{OrderStatus, UserRole};

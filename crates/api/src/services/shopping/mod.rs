//! Shopping services: the customer's cart and the orders placed from it.

mod cart;
mod orders;

pub use cart::{AddCartItemRequest, CartService, UpdateCartItemRequest};
pub use orders::{OrderService, UpdateOrderStatusRequest};

use thiserror::Error;

use crate::db::{CheckoutError, RepositoryError};

/// Errors that can occur while shopping.
#[derive(Debug, Error)]
pub enum ShoppingError {
    /// Input failed a validation rule.
    #[error("{0}")]
    Validation(String),

    #[error("product not found")]
    ProductNotFound,

    /// The product exists but is inactive or deleted.
    #[error("product is not available: {0}")]
    ProductUnavailable(String),

    #[error("insufficient stock for {name}: only {available} available")]
    InsufficientStock { name: String, available: i32 },

    #[error("cart item not found")]
    CartItemNotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("order not found")]
    OrderNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<CheckoutError> for ShoppingError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart => Self::EmptyCart,
            CheckoutError::ProductUnavailable(name) => Self::ProductUnavailable(name),
            CheckoutError::InsufficientStock {
                name, available, ..
            } => Self::InsufficientStock { name, available },
            CheckoutError::Repository(e) => Self::Repository(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_error_mapping() {
        assert!(matches!(
            ShoppingError::from(CheckoutError::EmptyCart),
            ShoppingError::EmptyCart
        ));

        let err = ShoppingError::from(CheckoutError::InsufficientStock {
            name: "Mug".to_string(),
            available: 1,
            requested: 4,
        });
        assert_eq!(err.to_string(), "insufficient stock for Mug: only 1 available");
    }
}

//! Order service.

use serde::Deserialize;
use sqlx::PgPool;

use bazaar_core::{OrderId, OrderStatus, PageMeta, Pagination, UserId};

use super::ShoppingError;
use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::models::{CurrentUser, Order};

/// Body of `PUT /orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    carts: CartRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            carts: CartRepository::new(pool),
        }
    }

    /// Place an order from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::EmptyCart` if there is nothing to order.
    /// Returns `ShoppingError::ProductUnavailable` or
    /// `ShoppingError::InsufficientStock` if a line can no longer be filled.
    pub async fn checkout(&self, user_id: UserId) -> Result<Order, ShoppingError> {
        let cart_id = self.carts.get_or_create(user_id).await?;
        let order = self.orders.place_from_cart(user_id, cart_id).await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total_amount,
            items = order.items.len(),
            "order placed"
        );
        Ok(order)
    }

    /// List one page of the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::Repository` if the query fails.
    pub async fn list(
        &self,
        user_id: UserId,
        page: Pagination,
    ) -> Result<(Vec<Order>, PageMeta), ShoppingError> {
        let (orders, total) = self.orders.list_for_user(user_id, page).await?;
        Ok((orders, page.meta(total)))
    }

    /// Get an order visible to `user`: their own, or any order for an admin.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::OrderNotFound` if the order doesn't exist or
    /// belongs to someone else.
    pub async fn get(&self, user: &CurrentUser, id: OrderId) -> Result<Order, ShoppingError> {
        self.orders
            .get_by_id(id)
            .await?
            .filter(|order| order.user_id == user.id || user.is_admin())
            .ok_or(ShoppingError::OrderNotFound)
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::OrderNotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        req: &UpdateOrderStatusRequest,
    ) -> Result<Order, ShoppingError> {
        let order = self
            .orders
            .update_status(id, req.status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ShoppingError::OrderNotFound,
                other => other.into(),
            })?;

        tracing::info!(order_id = %order.id, status = ?order.status, "order status updated");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_request_uses_snake_case() {
        let req: UpdateOrderStatusRequest =
            serde_json::from_str(r#"{"status": "shipped"}"#).unwrap();
        assert_eq!(req.status, OrderStatus::Shipped);

        assert!(serde_json::from_str::<UpdateOrderStatusRequest>(r#"{"status": "lost"}"#).is_err());
    }
}

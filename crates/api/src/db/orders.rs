//! Order repository, including the checkout transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bazaar_core::{CartId, OrderId, OrderItemId, OrderStatus, Pagination, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, status, total_amount, created_at, updated_at";

/// Reasons a cart cannot be turned into an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("product is no longer available: {0}")]
    ProductUnavailable(String),

    #[error("insufficient stock for {name}: {available} available, {requested} requested")]
    InsufficientStock {
        name: String,
        available: i32,
        requested: i32,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            status: self.status,
            total_amount: self.total_amount,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            line_total: row.unit_price * Decimal::from(row.quantity),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CheckoutLineRow {
    product_id: ProductId,
    quantity: i32,
    name: String,
    price: Decimal,
    stock: i32,
    available: bool,
}

/// Check every locked line against current stock and return the order total.
fn price_checkout(lines: &[CheckoutLineRow]) -> Result<Decimal, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut total = Decimal::ZERO;
    for line in lines {
        if !line.available {
            return Err(CheckoutError::ProductUnavailable(line.name.clone()));
        }
        if line.stock < line.quantity {
            return Err(CheckoutError::InsufficientStock {
                name: line.name.clone(),
                available: line.stock,
                requested: line.quantity,
            });
        }
        total += line.price * Decimal::from(line.quantity);
    }
    Ok(total)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn a cart into a pending order.
    ///
    /// In one transaction: lock the cart's products, check availability and
    /// stock, decrement stock, write the order with the current prices, and
    /// empty the cart. Any failure rolls everything back.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::ProductUnavailable` or
    /// `CheckoutError::InsufficientStock` if a line cannot be fulfilled.
    /// Returns `CheckoutError::Repository` if a query fails.
    pub async fn place_from_cart(
        &self,
        user_id: UserId,
        cart_id: CartId,
    ) -> Result<Order, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Lock in product order so concurrent checkouts cannot deadlock.
        let lines = sqlx::query_as::<_, CheckoutLineRow>(
            r"
            SELECT ci.product_id, ci.quantity, p.name, p.price, p.stock,
                   (p.is_active AND p.deleted_at IS NULL) AS available
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY p.id
            FOR UPDATE OF p
            ",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        let total = price_checkout(&lines)?;

        let order_id = sqlx::query_scalar::<_, OrderId>(
            r"
            INSERT INTO orders (user_id, status, total_amount)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(OrderStatus::Pending)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r"
                UPDATE products
                SET stock = stock - $2, updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(self
            .get_by_id(order_id)
            .await?
            .ok_or(RepositoryError::NotFound)?)
    }

    /// List one page of a user's orders, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: Pagination,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((self.with_items(rows).await?, total))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut orders = self.with_items(vec![row]).await?;
        Ok(orders.pop())
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let updated = sqlx::query_scalar::<_, OrderId>(
            r"
            UPDATE orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        self.get_by_id(updated).await?.ok_or(RepositoryError::NotFound)
    }

    async fn with_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<OrderId> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                   oi.quantity, oi.unit_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut items: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            items.entry(row.order_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(name: &str, price: &str, quantity: i32, stock: i32) -> CheckoutLineRow {
        CheckoutLineRow {
            product_id: ProductId::new(1),
            quantity,
            name: name.to_string(),
            price: price.parse().unwrap(),
            stock,
            available: true,
        }
    }

    #[test]
    fn test_price_checkout_sums_lines() {
        let total =
            price_checkout(&[line("Mug", "12.50", 2, 10), line("Tee", "20.00", 1, 1)]).unwrap();
        assert_eq!(total, "45.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_price_checkout_empty_cart() {
        assert!(matches!(price_checkout(&[]), Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_price_checkout_insufficient_stock() {
        let err = price_checkout(&[line("Mug", "12.50", 3, 2)]).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_price_checkout_unavailable_product() {
        let mut gone = line("Retired Mug", "12.50", 1, 5);
        gone.available = false;
        let err = price_checkout(&[gone]).unwrap_err();
        assert!(matches!(err, CheckoutError::ProductUnavailable(name) if name == "Retired Mug"));
    }
}

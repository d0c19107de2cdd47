//! Shopping cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bazaar_core::{CartId, CartItemId, ProductId, UserId};

/// A user's cart with priced lines.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub item_count: i64,
    pub total: Decimal,
}

impl Cart {
    /// Build a cart from its lines, computing the totals.
    #[must_use]
    pub fn new(id: CartId, user_id: UserId, items: Vec<CartItem>) -> Self {
        let item_count = items.iter().map(|i| i64::from(i.quantity)).sum();
        let total = items.iter().map(|i| i.line_total).sum();
        Self {
            id,
            user_id,
            items,
            item_count,
            total,
        }
    }
}

/// One product line in a cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub line_total: Decimal,
    pub product: CartProduct,
    pub created_at: DateTime<Utc>,
}

/// The product fields shown on a cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, price: &str, quantity: i32) -> CartItem {
        let price: Decimal = price.parse().unwrap();
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(id),
            quantity,
            line_total: price * Decimal::from(quantity),
            product: CartProduct {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                sku: format!("SKU-{id}"),
                price,
                stock: 100,
                is_active: true,
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart::new(
            CartId::new(1),
            UserId::new(1),
            vec![line(1, "19.99", 2), line(2, "5.50", 3)],
        );
        assert_eq!(cart.item_count, 5);
        assert_eq!(cart.total, "56.48".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new(CartId::new(1), UserId::new(1), Vec::new());
        assert_eq!(cart.item_count, 0);
        assert_eq!(cart.total, Decimal::ZERO);
    }
}

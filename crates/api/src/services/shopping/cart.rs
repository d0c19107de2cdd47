//! Cart service.

use serde::Deserialize;
use sqlx::PgPool;

use bazaar_core::{CartItemId, ProductId, UserId};

use super::ShoppingError;
use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{Cart, Product};

/// Body of `POST /cart/items`.
#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Body of `PUT /cart/items/{item_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// Service for the authenticated user's cart.
///
/// Every operation creates the cart on first use and returns the cart as it
/// stands afterwards.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Get the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::Repository` if a query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Cart, ShoppingError> {
        let cart_id = self.carts.get_or_create(user_id).await?;
        Ok(self.carts.load(cart_id, user_id).await?)
    }

    /// Add a product, merging with any existing line for it.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::Validation` if the quantity is below 1.
    /// Returns `ShoppingError::ProductNotFound` if the product doesn't exist.
    /// Returns `ShoppingError::ProductUnavailable` if it is inactive.
    /// Returns `ShoppingError::InsufficientStock` if the merged quantity
    /// exceeds stock.
    pub async fn add_item(
        &self,
        user_id: UserId,
        req: &AddCartItemRequest,
    ) -> Result<Cart, ShoppingError> {
        check_quantity(req.quantity)?;
        let product = self.available_product(req.product_id).await?;

        let cart_id = self.carts.get_or_create(user_id).await?;
        let existing = self
            .carts
            .find_line_by_product(cart_id, product.id)
            .await?
            .map_or(0, |line| line.quantity);
        let wanted = existing
            .checked_add(req.quantity)
            .ok_or_else(|| ShoppingError::Validation("quantity is too large".into()))?;
        check_stock(&product, wanted)?;

        self.carts.add(cart_id, product.id, req.quantity).await?;
        Ok(self.carts.load(cart_id, user_id).await?)
    }

    /// Set the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::Validation` if the quantity is below 1.
    /// Returns `ShoppingError::CartItemNotFound` if the line isn't in the cart.
    /// Returns `ShoppingError::ProductUnavailable` or
    /// `ShoppingError::InsufficientStock` if the product can't cover it.
    pub async fn update_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        req: &UpdateCartItemRequest,
    ) -> Result<Cart, ShoppingError> {
        check_quantity(req.quantity)?;

        let cart_id = self.carts.get_or_create(user_id).await?;
        let line = self
            .carts
            .find_line(cart_id, item_id)
            .await?
            .ok_or(ShoppingError::CartItemNotFound)?;
        let product = self.available_product(line.product_id).await?;
        check_stock(&product, req.quantity)?;

        self.carts
            .set_quantity(cart_id, item_id, req.quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ShoppingError::CartItemNotFound,
                other => other.into(),
            })?;
        Ok(self.carts.load(cart_id, user_id).await?)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::CartItemNotFound` if the line isn't in the cart.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<Cart, ShoppingError> {
        let cart_id = self.carts.get_or_create(user_id).await?;
        if !self.carts.remove(cart_id, item_id).await? {
            return Err(ShoppingError::CartItemNotFound);
        }
        Ok(self.carts.load(cart_id, user_id).await?)
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::Repository` if a query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<Cart, ShoppingError> {
        let cart_id = self.carts.get_or_create(user_id).await?;
        self.carts.clear(cart_id).await?;
        Ok(self.carts.load(cart_id, user_id).await?)
    }

    async fn available_product(&self, id: ProductId) -> Result<Product, ShoppingError> {
        let product = self
            .products
            .get_by_id(id)
            .await?
            .ok_or(ShoppingError::ProductNotFound)?;
        if !product.is_active {
            return Err(ShoppingError::ProductUnavailable(product.name));
        }
        Ok(product)
    }
}

fn check_quantity(quantity: i32) -> Result<(), ShoppingError> {
    if quantity < 1 {
        return Err(ShoppingError::Validation(
            "quantity must be at least 1".into(),
        ));
    }
    Ok(())
}

fn check_stock(product: &Product, wanted: i32) -> Result<(), ShoppingError> {
    if wanted > product.stock {
        return Err(ShoppingError::InsufficientStock {
            name: product.name.clone(),
            available: product.stock,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_defaults_to_one() {
        let req: AddCartItemRequest = serde_json::from_str(r#"{"product_id": 7}"#).unwrap();
        assert_eq!(req.product_id, ProductId::new(7));
        assert_eq!(req.quantity, 1);
    }

    #[test]
    fn test_check_quantity() {
        assert!(check_quantity(1).is_ok());
        assert!(matches!(check_quantity(0), Err(ShoppingError::Validation(_))));
        assert!(check_quantity(-3).is_err());
    }
}

//! Cart routes. Every response carries the cart as it stands afterwards.

use axum::extract::State;

use bazaar_core::CartItemId;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::Cart;
use crate::response::ApiResponse;
use crate::services::CartService;
use crate::services::shopping::{AddCartItemRequest, UpdateCartItemRequest};
use crate::state::AppState;

/// GET /api/v1/cart
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.pool()).get(user.id).await?;
    Ok(ApiResponse::ok("Cart retrieved successfully", cart))
}

/// POST /api/v1/cart/items
///
/// # Errors
///
/// Returns 400 if the product is unavailable or stock would be exceeded,
/// 404 if the product doesn't exist.
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<AddCartItemRequest>,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.pool()).add_item(user.id, &req).await?;
    Ok(ApiResponse::ok("Item added to cart", cart))
}

/// PUT /api/v1/cart/items/{item_id}
///
/// # Errors
///
/// Returns 400 for a bad quantity, 404 if the line isn't in the cart.
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(item_id): ApiPath<CartItemId>,
    ApiJson(req): ApiJson<UpdateCartItemRequest>,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.pool())
        .update_item(user.id, item_id, &req)
        .await?;
    Ok(ApiResponse::ok("Cart item updated", cart))
}

/// DELETE /api/v1/cart/items/{item_id}
///
/// # Errors
///
/// Returns 404 if the line isn't in the cart.
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(item_id): ApiPath<CartItemId>,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.pool())
        .remove_item(user.id, item_id)
        .await?;
    Ok(ApiResponse::ok("Item removed from cart", cart))
}

/// DELETE /api/v1/cart
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.pool()).clear(user.id).await?;
    Ok(ApiResponse::ok("Cart cleared", cart))
}

//! Order routes.

use axum::extract::State;

use bazaar_core::OrderId;

use super::PageQuery;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::Order;
use crate::response::ApiResponse;
use crate::services::OrderService;
use crate::services::shopping::UpdateOrderStatusRequest;
use crate::state::AppState;

/// GET /api/v1/orders?page=&limit=
///
/// The caller's own orders, newest first.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Vec<Order>>> {
    let (orders, meta) = OrderService::new(state.pool())
        .list(user.id, query.pagination())
        .await?;
    Ok(ApiResponse::paginated(
        "Orders retrieved successfully",
        orders,
        meta,
    ))
}

/// POST /api/v1/orders
///
/// Checks out the caller's cart.
///
/// # Errors
///
/// Returns 400 if the cart is empty or a line can no longer be filled.
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Order>> {
    let order = OrderService::new(state.pool()).checkout(user.id).await?;
    Ok(ApiResponse::created("Order placed successfully", order))
}

/// GET /api/v1/orders/{id}
///
/// # Errors
///
/// Returns 404 if the order doesn't exist or belongs to another customer.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<ApiResponse<Order>> {
    let order = OrderService::new(state.pool()).get(&user, id).await?;
    Ok(ApiResponse::ok("Order retrieved successfully", order))
}

/// PUT /api/v1/orders/{id}/status (admin)
///
/// # Errors
///
/// Returns 400 for an unknown status, 404 if the order doesn't exist.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(req): ApiJson<UpdateOrderStatusRequest>,
) -> Result<ApiResponse<Order>> {
    let order = OrderService::new(state.pool())
        .update_status(id, &req)
        .await?;
    Ok(ApiResponse::ok("Order status updated successfully", order))
}

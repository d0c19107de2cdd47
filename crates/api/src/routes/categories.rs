//! Category routes.

use axum::extract::State;

use bazaar_core::CategoryId;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::Category;
use crate::response::ApiResponse;
use crate::services::CatalogService;
use crate::services::catalog::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::state::AppState;

/// GET /api/v1/categories
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(State(state): State<AppState>) -> Result<ApiResponse<Vec<Category>>> {
    let categories = CatalogService::new(state.pool()).list_categories().await?;
    Ok(ApiResponse::ok("Categories retrieved successfully", categories))
}

/// GET /api/v1/categories/{id}
///
/// # Errors
///
/// Returns 404 if the category doesn't exist.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<ApiResponse<Category>> {
    let category = CatalogService::new(state.pool()).get_category(id).await?;
    Ok(ApiResponse::ok("Category retrieved successfully", category))
}

/// POST /api/v1/categories (admin)
///
/// # Errors
///
/// Returns 400 if the name is blank or taken.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> Result<ApiResponse<Category>> {
    let category = CatalogService::new(state.pool())
        .create_category(&req)
        .await?;
    Ok(ApiResponse::created("Category created successfully", category))
}

/// PUT /api/v1/categories/{id} (admin)
///
/// # Errors
///
/// Returns 400 for a blank or taken name, 404 if the category doesn't exist.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<CategoryId>,
    ApiJson(req): ApiJson<UpdateCategoryRequest>,
) -> Result<ApiResponse<Category>> {
    let category = CatalogService::new(state.pool())
        .update_category(id, &req)
        .await?;
    Ok(ApiResponse::ok("Category updated successfully", category))
}

/// DELETE /api/v1/categories/{id} (admin)
///
/// # Errors
///
/// Returns 404 if the category doesn't exist.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<ApiResponse<()>> {
    CatalogService::new(state.pool()).delete_category(id).await?;
    Ok(ApiResponse::message("Category deleted successfully"))
}

//! Product, search, and product image routes.

use axum::extract::State;

use bazaar_core::{CategoryId, ProductId, ProductImageId};

use super::PageQuery;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductImage, SearchHit};
use crate::response::ApiResponse;
use crate::services::CatalogService;
use crate::services::catalog::{
    AddImageRequest, CreateProductRequest, SearchParams, UpdateProductRequest,
};
use crate::state::AppState;

/// GET /api/v1/products?page=&limit=
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Vec<Product>>> {
    let (products, meta) = CatalogService::new(state.pool())
        .list_products(query.pagination())
        .await?;
    Ok(ApiResponse::paginated(
        "Products retrieved successfully",
        products,
        meta,
    ))
}

/// GET /api/v1/products/search?q=&category_id=&min_price=&max_price=&page=&limit=
///
/// Results are ordered by relevance, then newest first.
///
/// # Errors
///
/// Returns 400 if `q` is missing or a filter is malformed.
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<ApiResponse<Vec<SearchHit>>> {
    let (hits, meta) = CatalogService::new(state.pool()).search(&params).await?;
    Ok(ApiResponse::paginated(
        "Search results retrieved successfully",
        hits,
        meta,
    ))
}

/// GET /api/v1/products/category/{category_id}
///
/// An unknown category yields an empty list.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<ApiResponse<Vec<Product>>> {
    let products = CatalogService::new(state.pool())
        .products_by_category(category_id)
        .await?;
    Ok(ApiResponse::ok("Products retrieved successfully", products))
}

/// GET /api/v1/products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<ApiResponse<Product>> {
    let product = CatalogService::new(state.pool()).get_product(id).await?;
    Ok(ApiResponse::ok("Product retrieved successfully", product))
}

/// POST /api/v1/products (admin)
///
/// # Errors
///
/// Returns 400 for invalid fields, an unknown category, or a taken SKU.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> Result<ApiResponse<Product>> {
    let product = CatalogService::new(state.pool())
        .create_product(&req)
        .await?;
    Ok(ApiResponse::created("Product created successfully", product))
}

/// PUT /api/v1/products/{id} (admin)
///
/// # Errors
///
/// Returns 400 for invalid fields, 404 if the product doesn't exist.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(req): ApiJson<UpdateProductRequest>,
) -> Result<ApiResponse<Product>> {
    let product = CatalogService::new(state.pool())
        .update_product(id, &req)
        .await?;
    Ok(ApiResponse::ok("Product updated successfully", product))
}

/// DELETE /api/v1/products/{id} (admin)
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<ApiResponse<()>> {
    CatalogService::new(state.pool()).delete_product(id).await?;
    Ok(ApiResponse::message("Product deleted successfully"))
}

/// POST /api/v1/products/{id}/images (admin)
///
/// # Errors
///
/// Returns 400 for a bad URL, 404 if the product doesn't exist.
pub async fn add_image(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(req): ApiJson<AddImageRequest>,
) -> Result<ApiResponse<ProductImage>> {
    let image = CatalogService::new(state.pool())
        .add_image(id, &req)
        .await?;
    Ok(ApiResponse::created("Image added successfully", image))
}

/// DELETE /api/v1/products/{id}/images/{image_id} (admin)
///
/// # Errors
///
/// Returns 404 if the image isn't attached to the product.
pub async fn delete_image(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath((id, image_id)): ApiPath<(ProductId, ProductImageId)>,
) -> Result<ApiResponse<()>> {
    CatalogService::new(state.pool())
        .delete_image(id, image_id)
        .await?;
    Ok(ApiResponse::message("Image deleted successfully"))
}

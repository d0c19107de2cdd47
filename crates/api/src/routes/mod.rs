//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! Everything below is nested under `/api/v1`.
//!
//! ```text
//! # Auth (strict rate limit)
//! POST   /auth/register
//! POST   /auth/login
//! POST   /auth/refresh
//! POST   /auth/logout
//!
//! # Users (bearer)
//! GET    /users/profile
//! PUT    /users/profile
//!
//! # Categories
//! GET    /categories
//! POST   /categories                        - admin
//! GET    /categories/{id}
//! PUT    /categories/{id}                   - admin
//! DELETE /categories/{id}                   - admin
//!
//! # Products
//! GET    /products                          - paginated
//! POST   /products                          - admin
//! GET    /products/search                   - paginated
//! GET    /products/category/{category_id}
//! GET    /products/{id}
//! PUT    /products/{id}                     - admin
//! DELETE /products/{id}                     - admin
//! POST   /products/{id}/images              - admin
//! DELETE /products/{id}/images/{image_id}   - admin
//!
//! # Cart (bearer)
//! GET    /cart
//! DELETE /cart
//! POST   /cart/items
//! PUT    /cart/items/{item_id}
//! DELETE /cart/items/{item_id}
//!
//! # Orders (bearer)
//! GET    /orders                            - paginated
//! POST   /orders                            - checkout
//! GET    /orders/{id}
//! PUT    /orders/{id}/status                - admin
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use bazaar_core::Pagination;

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// `?page=&limit=` on list endpoints. Unparseable values fall back to the
/// defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Clamped pagination for this query.
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/profile", get(users::profile).put(users::update_profile))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::destroy),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/search", get(products::search))
        .route("/category/{category_id}", get(products::by_category))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/{id}/images", post(products::add_image))
        .route("/{id}/images/{image_id}", delete(products::delete_image))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{item_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::checkout))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
}

/// Create all `/api/v1` routes, each group behind its rate limiter.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/users", user_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .layer(api_rate_limiter());

    Router::new()
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        .merge(api)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_clamps() {
        let query = PageQuery {
            page: Some("-2".into()),
            limit: Some("abc".into()),
        };
        assert_eq!(query.pagination(), Pagination::default());

        let query = PageQuery {
            page: Some("3".into()),
            limit: Some("1000".into()),
        };
        assert_eq!(query.pagination().page(), 3);
        assert_eq!(query.pagination().limit(), Pagination::MAX_LIMIT);
    }
}

//! Catalog service: categories, products, images, and search.

mod error;

pub use error::CatalogError;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use bazaar_core::{CategoryId, PageMeta, Pagination, ProductId, ProductImageId};

use crate::db::{
    CategoryRepository, NewProduct, ProductChanges, ProductRepository, RepositoryError,
    SearchFilter,
};
use crate::models::{Category, Product, ProductImage, SearchHit};

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Body of `PUT /categories/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Body of `POST /products`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub sku: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Body of `PUT /products/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub sku: Option<String>,
    pub is_active: Option<bool>,
}

/// Body of `POST /products/{id}/images`.
#[derive(Debug, Deserialize)]
pub struct AddImageRequest {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Query string of `GET /products/search`.
///
/// Everything arrives as text: paging falls back to defaults when
/// unparseable, while malformed filters are rejected.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// Validate into a repository filter and pagination.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `q` is blank or a filter is
    /// malformed, out of range, or inverted.
    pub fn parse(&self) -> Result<(SearchFilter, Pagination), CatalogError> {
        let query = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| CatalogError::Validation("search query 'q' is required".into()))?;

        let category_id = parse_filter::<CategoryId>(self.category_id.as_deref(), "category_id")?;
        let min_price = parse_filter::<Decimal>(self.min_price.as_deref(), "min_price")?;
        let max_price = parse_filter::<Decimal>(self.max_price.as_deref(), "max_price")?;

        let min_price = min_price
            .map(|price| check_price(price, "min_price"))
            .transpose()?;
        let max_price = max_price
            .map(|price| check_price(price, "max_price"))
            .transpose()?;
        if let (Some(min), Some(max)) = (min_price, max_price)
            && min > max
        {
            return Err(CatalogError::Validation(
                "min_price cannot be greater than max_price".into(),
            ));
        }

        let filter = SearchFilter {
            query: query.to_owned(),
            category_id,
            min_price,
            max_price,
        };
        let page = Pagination::from_query(self.page.as_deref(), self.limit.as_deref());
        Ok((filter, page))
    }
}

fn parse_filter<T: std::str::FromStr>(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<T>, CatalogError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| CatalogError::Validation(format!("{field} is invalid"))),
    }
}

fn non_blank<'s>(value: &'s str, field: &str) -> Result<&'s str, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Decimal places stored for prices (`NUMERIC(12, 2)`).
const PRICE_SCALE: u32 = 2;

/// Largest value a `NUMERIC(12, 2)` price column holds.
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, PRICE_SCALE)
}

fn check_price(price: Decimal, field: &str) -> Result<Decimal, CatalogError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CatalogError::Validation(format!("{field} cannot be negative")));
    }
    if price > max_price() {
        return Err(CatalogError::Validation(format!(
            "{field} cannot exceed {}",
            max_price()
        )));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(CatalogError::Validation(format!(
            "{field} cannot have more than {PRICE_SCALE} decimal places"
        )));
    }
    Ok(price)
}

fn check_stock(stock: i32) -> Result<i32, CatalogError> {
    if stock < 0 {
        return Err(CatalogError::Validation("stock cannot be negative".into()));
    }
    Ok(stock)
}

fn check_image_url(url: &str) -> Result<&str, CatalogError> {
    let url = non_blank(url, "url")?;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CatalogError::Validation(
            "url must start with http:// or https://".into(),
        ));
    }
    Ok(url)
}

// =============================================================================
// Service
// =============================================================================

/// Catalog service.
pub struct CatalogService<'a> {
    categories: CategoryRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the name is blank.
    /// Returns `CatalogError::Duplicate` if the name is taken.
    pub async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<Category, CatalogError> {
        let name = non_blank(&req.name, "name")?;
        let category = self
            .categories
            .create(
                name,
                req.description.as_deref(),
                req.is_active.unwrap_or(true),
            )
            .await?;

        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// List active categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.list_active().await?)
    }

    /// Get a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if it doesn't exist.
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.categories
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if a new name is blank.
    /// Returns `CatalogError::CategoryNotFound` if it doesn't exist.
    /// Returns `CatalogError::Duplicate` if the new name is taken.
    pub async fn update_category(
        &self,
        id: CategoryId,
        req: &UpdateCategoryRequest,
    ) -> Result<Category, CatalogError> {
        let name = req
            .name
            .as_deref()
            .map(|n| non_blank(n, "name"))
            .transpose()?;

        self.categories
            .update(id, name, req.description.as_deref(), req.is_active)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CatalogError::CategoryNotFound,
                other => other.into(),
            })
    }

    /// Soft delete a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if it doesn't exist.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        if !self.categories.soft_delete(id).await? {
            return Err(CatalogError::CategoryNotFound);
        }
        tracing::info!(category_id = %id, "category deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if a field is blank or negative.
    /// Returns `CatalogError::UnknownCategory` if the category doesn't exist.
    /// Returns `CatalogError::Duplicate` if the SKU is taken.
    pub async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<Product, CatalogError> {
        let new = NewProduct {
            category_id: req.category_id,
            name: non_blank(&req.name, "name")?,
            description: req.description.as_deref(),
            price: check_price(req.price, "price")?,
            stock: check_stock(req.stock)?,
            sku: non_blank(&req.sku, "sku")?,
            is_active: req.is_active.unwrap_or(true),
        };
        self.ensure_category(new.category_id).await?;

        let product = self.products.create(&new).await?;
        tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    /// List one page of active products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_products(
        &self,
        page: Pagination,
    ) -> Result<(Vec<Product>, PageMeta), CatalogError> {
        let (products, total) = self.products.list_active(page).await?;
        Ok((products, page.meta(total)))
    }

    /// Get a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if it doesn't exist.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if a given field is blank or negative.
    /// Returns `CatalogError::UnknownCategory` if a new category doesn't exist.
    /// Returns `CatalogError::ProductNotFound` if the product doesn't exist.
    /// Returns `CatalogError::Duplicate` if the new SKU is taken.
    pub async fn update_product(
        &self,
        id: ProductId,
        req: &UpdateProductRequest,
    ) -> Result<Product, CatalogError> {
        let changes = ProductChanges {
            category_id: req.category_id,
            name: req.name.as_deref().map(|n| non_blank(n, "name")).transpose()?,
            description: req.description.as_deref(),
            price: req.price.map(|price| check_price(price, "price")).transpose()?,
            stock: req.stock.map(check_stock).transpose()?,
            sku: req.sku.as_deref().map(|s| non_blank(s, "sku")).transpose()?,
            is_active: req.is_active,
        };
        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id).await?;
        }

        self.products
            .update(id, &changes)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CatalogError::ProductNotFound,
                other => other.into(),
            })
    }

    /// Soft delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if it doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        if !self.products.soft_delete(id).await? {
            return Err(CatalogError::ProductNotFound);
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// List every active product in a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_by_category(category_id).await?)
    }

    /// Full-text search over active products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the parameters are invalid.
    pub async fn search(
        &self,
        params: &SearchParams,
    ) -> Result<(Vec<SearchHit>, PageMeta), CatalogError> {
        let (filter, page) = params.parse()?;
        let (hits, total) = self.products.search(&filter, page).await?;
        Ok((hits, page.meta(total)))
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Attach an image URL to a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the URL is blank or not http(s).
    /// Returns `CatalogError::ProductNotFound` if the product doesn't exist.
    pub async fn add_image(
        &self,
        product_id: ProductId,
        req: &AddImageRequest,
    ) -> Result<ProductImage, CatalogError> {
        let url = check_image_url(&req.url)?;
        if self.products.get_by_id(product_id).await?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }

        let alt_text = req.alt_text.as_deref().map(str::trim).filter(|a| !a.is_empty());
        Ok(self
            .products
            .add_image(product_id, url, alt_text, req.is_primary)
            .await?)
    }

    /// Soft delete one of a product's images.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ImageNotFound` if the image isn't on the product.
    pub async fn delete_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> Result<(), CatalogError> {
        if !self.products.delete_image(product_id, image_id).await? {
            return Err(CatalogError::ImageNotFound);
        }
        Ok(())
    }

    async fn ensure_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        if self.categories.get_by_id(id).await?.is_none() {
            return Err(CatalogError::UnknownCategory);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(q: &str) -> SearchParams {
        SearchParams {
            q: Some(q.to_string()),
            ..SearchParams::default()
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(matches!(
            SearchParams::default().parse(),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            params("   ").parse(),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_search_defaults() {
        let (filter, page) = params("  coffee mug ").parse().unwrap();
        assert_eq!(filter.query, "coffee mug");
        assert_eq!(filter.category_id, None);
        assert_eq!(page, Pagination::default());
    }

    #[test]
    fn test_search_filters_and_paging() {
        let (filter, page) = SearchParams {
            category_id: Some("4".into()),
            min_price: Some("9.99".into()),
            max_price: Some("25".into()),
            page: Some("0".into()),
            limit: Some("500".into()),
            ..params("mug")
        }
        .parse()
        .unwrap();

        assert_eq!(filter.category_id, Some(CategoryId::new(4)));
        assert_eq!(filter.min_price, Some("9.99".parse().unwrap()));
        assert_eq!(filter.max_price, Some(Decimal::from(25)));
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), Pagination::MAX_LIMIT);
    }

    #[test]
    fn test_search_rejects_bad_filters() {
        let bad_category = SearchParams {
            category_id: Some("shoes".into()),
            ..params("mug")
        };
        assert!(bad_category.parse().is_err());

        let negative = SearchParams {
            min_price: Some("-1".into()),
            ..params("mug")
        };
        assert!(negative.parse().is_err());

        let inverted = SearchParams {
            min_price: Some("30".into()),
            max_price: Some("10".into()),
            ..params("mug")
        };
        assert!(inverted.parse().is_err());
    }

    #[test]
    fn test_field_checks() {
        assert_eq!(non_blank(" Mugs ", "name").unwrap(), "Mugs");
        assert!(non_blank("", "name").is_err());
        assert!(check_stock(-1).is_err());
        assert!(check_stock(0).is_ok());
        assert!(check_image_url("https://cdn.example.com/mug.jpg").is_ok());
        assert!(check_image_url("ftp://cdn.example.com/mug.jpg").is_err());
    }

    #[test]
    fn test_price_must_fit_the_column() {
        assert!(check_price(Decimal::new(-1, 2), "price").is_err());
        assert!(check_price(Decimal::ZERO, "price").is_ok());
        assert!(check_price("14.50".parse().unwrap(), "price").is_ok());
        assert!(check_price("3.000".parse().unwrap(), "price").is_ok());
        assert!(check_price("9999999999.99".parse().unwrap(), "price").is_ok());

        assert!(matches!(
            check_price(Decimal::from(1_000_000_000_000_i64), "price"),
            Err(CatalogError::Validation(msg)) if msg == "price cannot exceed 9999999999.99"
        ));
        assert!(matches!(
            check_price("1.999".parse().unwrap(), "price"),
            Err(CatalogError::Validation(msg))
                if msg == "price cannot have more than 2 decimal places"
        ));
    }

    #[test]
    fn test_search_price_filters_are_bounded() {
        let huge = SearchParams {
            max_price: Some("1000000000000".into()),
            ..params("mug")
        };
        assert!(matches!(huge.parse(), Err(CatalogError::Validation(_))));

        let fractional = SearchParams {
            min_price: Some("0.001".into()),
            ..params("mug")
        };
        assert!(matches!(fractional.parse(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_duplicate_conflict_maps_to_duplicate() {
        let err: CatalogError = RepositoryError::Conflict("sku already exists".into()).into();
        assert!(matches!(err, CatalogError::Duplicate(msg) if msg == "sku already exists"));
    }
}

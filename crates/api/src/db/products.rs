//! Product repository: CRUD, listing, full-text search, and images.
//!
//! Every product is returned with its category and its live images. Pages are
//! fetched in one query and their images in a second `ANY($1)` query, so a
//! page costs two round trips regardless of size.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use bazaar_core::{CategoryId, Pagination, ProductId, ProductImageId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::{CategorySummary, Product, ProductImage, SearchHit};

const PRODUCT_SELECT: &str = r"
    SELECT p.id, p.category_id, p.name, p.description, p.price, p.stock, p.sku,
           p.is_active, p.created_at, p.updated_at,
           c.name AS category_name,
           c.description AS category_description,
           c.is_active AS category_is_active
    FROM products p
    JOIN categories c ON c.id = p.category_id
";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    category_id: CategoryId,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock: i32,
    sku: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: String,
    category_description: Option<String>,
    category_is_active: bool,
}

impl ProductRow {
    fn into_product(self, images: Vec<ProductImage>) -> Product {
        Product {
            id: self.id,
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            sku: self.sku,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            category: CategorySummary {
                id: self.category_id,
                name: self.category_name,
                description: self.category_description,
                is_active: self.category_is_active,
            },
            images,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    product: ProductRow,
    rank: f32,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductImageRow {
    id: ProductImageId,
    product_id: ProductId,
    url: String,
    alt_text: Option<String>,
    is_primary: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            url: row.url,
            alt_text: row.alt_text,
            is_primary: row.is_primary,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Fields for a new product. Values are expected to be validated already.
#[derive(Debug)]
pub struct NewProduct<'a> {
    pub category_id: CategoryId,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub stock: i32,
    pub sku: &'a str,
    pub is_active: bool,
}

/// A partial product update. `None` leaves a column untouched.
#[derive(Debug, Default)]
pub struct ProductChanges<'a> {
    pub category_id: Option<CategoryId>,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub sku: Option<&'a str>,
    pub is_active: Option<bool>,
}

/// Best match first, then newest, then highest id.
const SEARCH_ORDER: &str = " ORDER BY rank DESC, p.created_at DESC, p.id DESC";

/// Full-text search terms and optional filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub query: String,
    pub category_id: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl SearchFilter {
    /// Append the `WHERE` clause shared by the count and page queries.
    fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE p.search_vector @@ plainto_tsquery('english', ")
            .push_bind(self.query.clone())
            .push(") AND p.is_active AND p.deleted_at IS NULL");

        if let Some(category_id) = self.category_id {
            qb.push(" AND p.category_id = ").push_bind(category_id);
        }
        if let Some(min_price) = self.min_price {
            qb.push(" AND p.price >= ").push_bind(min_price);
        }
        if let Some(max_price) = self.max_price {
            qb.push(" AND p.price <= ").push_bind(max_price);
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU is taken.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewProduct<'_>) -> Result<Product, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            r"
            INSERT INTO products (category_id, name, description, price, stock, sku, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(new.category_id)
        .bind(new.name)
        .bind(new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.sku)
        .bind(new.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "sku"))?;

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Get a product by ID, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.id = $1 AND p.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut products = self.with_images(vec![row]).await?;
        Ok(products.pop())
    }

    /// Get the ID of the live product with this SKU.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_id_by_sku(&self, sku: &str) -> Result<Option<ProductId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            "SELECT id FROM products WHERE sku = $1 AND deleted_at IS NULL",
        )
        .bind(sku)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// List one page of active products, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(
        &self,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE is_active AND deleted_at IS NULL",
        )
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            {PRODUCT_SELECT}
            WHERE p.is_active AND p.deleted_at IS NULL
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1 OFFSET $2
            "
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((self.with_images(rows).await?, total))
    }

    /// List every active product in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            {PRODUCT_SELECT}
            WHERE p.category_id = $1 AND p.is_active AND p.deleted_at IS NULL
            ORDER BY p.created_at DESC, p.id DESC
            "
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        self.with_images(rows).await
    }

    /// Full-text search over active products.
    ///
    /// Results are ordered by `ts_rank`, then by recency, then by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        page: Pagination,
    ) -> Result<(Vec<SearchHit>, i64), RepositoryError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        filter.push_conditions(&mut count);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(
            r"
            SELECT p.id, p.category_id, p.name, p.description, p.price, p.stock, p.sku,
                   p.is_active, p.created_at, p.updated_at,
                   c.name AS category_name,
                   c.description AS category_description,
                   c.is_active AS category_is_active,
                   ts_rank(p.search_vector, plainto_tsquery('english', ",
        );
        qb.push_bind(filter.query.clone())
            .push(")) AS rank FROM products p JOIN categories c ON c.id = p.category_id");
        filter.push_conditions(&mut qb);
        qb.push(SEARCH_ORDER)
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = qb
            .build_query_as::<SearchRow>()
            .fetch_all(self.pool)
            .await?;

        let ranks: Vec<f32> = rows.iter().map(|r| r.rank).collect();
        let products = self
            .with_images(rows.into_iter().map(|r| r.product).collect())
            .await?;
        let hits = products
            .into_iter()
            .zip(ranks)
            .map(|(product, rank)| SearchHit { product, rank })
            .collect();

        Ok((hits, total))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the new SKU is taken.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges<'_>,
    ) -> Result<Product, RepositoryError> {
        let updated = sqlx::query_scalar::<_, ProductId>(
            r"
            UPDATE products
            SET category_id = COALESCE($2, category_id),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                stock = COALESCE($6, stock),
                sku = COALESCE($7, sku),
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id
            ",
        )
        .bind(id)
        .bind(changes.category_id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .bind(changes.sku)
        .bind(changes.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "sku"))?
        .ok_or(RepositoryError::NotFound)?;

        self.get_by_id(updated).await?.ok_or(RepositoryError::NotFound)
    }

    /// Soft delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn soft_delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Attach an image to a product.
    ///
    /// When `is_primary` is set, the flag is cleared on the product's other
    /// images in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_image(
        &self,
        product_id: ProductId,
        url: &str,
        alt_text: Option<&str>,
        is_primary: bool,
    ) -> Result<ProductImage, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if is_primary {
            sqlx::query(
                r"
                UPDATE product_images
                SET is_primary = FALSE, updated_at = NOW()
                WHERE product_id = $1 AND is_primary AND deleted_at IS NULL
                ",
            )
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, ProductImageRow>(
            r"
            INSERT INTO product_images (product_id, url, alt_text, is_primary)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, url, alt_text, is_primary, created_at
            ",
        )
        .bind(product_id)
        .bind(url)
        .bind(alt_text)
        .bind(is_primary)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Soft delete one of a product's images.
    ///
    /// # Returns
    ///
    /// Returns `true` if the image was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product_images
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND product_id = $2 AND deleted_at IS NULL
            ",
        )
        .bind(image_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load the live images for `rows` and assemble products in row order.
    async fn with_images(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ProductId> = rows.iter().map(|r| r.id).collect();
        let image_rows = sqlx::query_as::<_, ProductImageRow>(
            r"
            SELECT id, product_id, url, alt_text, is_primary, created_at
            FROM product_images
            WHERE product_id = ANY($1) AND deleted_at IS NULL
            ORDER BY is_primary DESC, id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut images: HashMap<ProductId, Vec<ProductImage>> = HashMap::new();
        for row in image_rows {
            images.entry(row.product_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let product_images = images.remove(&row.id).unwrap_or_default();
                row.into_product(product_images)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filter() -> SearchFilter {
        SearchFilter {
            query: "wireless headphones".to_string(),
            category_id: None,
            min_price: None,
            max_price: None,
        }
    }

    #[test]
    fn test_search_conditions_without_filters() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        filter().push_conditions(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM products p WHERE p.search_vector @@ plainto_tsquery('english', $1) \
             AND p.is_active AND p.deleted_at IS NULL"
        );
    }

    #[test]
    fn test_search_conditions_bind_in_order() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        SearchFilter {
            category_id: Some(CategoryId::new(3)),
            min_price: Some(Decimal::new(1000, 2)),
            max_price: Some(Decimal::new(5000, 2)),
            ..filter()
        }
        .push_conditions(&mut qb);

        let sql = qb.sql();
        assert!(sql.contains("p.category_id = $2"));
        assert!(sql.contains("p.price >= $3"));
        assert!(sql.contains("p.price <= $4"));
    }

    #[test]
    fn test_search_order_breaks_ties_by_recency_then_id() {
        let rank = SEARCH_ORDER.find("rank DESC").unwrap();
        let created = SEARCH_ORDER.find("p.created_at DESC").unwrap();
        let id = SEARCH_ORDER.find("p.id DESC").unwrap();
        assert!(rank < created && created < id);
    }
}

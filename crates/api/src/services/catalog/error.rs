//! Catalog error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input failed a validation rule.
    #[error("{0}")]
    Validation(String),

    /// The category in the path does not exist.
    #[error("category not found")]
    CategoryNotFound,

    /// A product references a category that does not exist.
    #[error("category does not exist")]
    UnknownCategory,

    /// The product in the path does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The image in the path does not exist on this product.
    #[error("image not found")]
    ImageNotFound,

    /// A unique name or SKU is already taken.
    #[error("{0}")]
    Duplicate(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(what) => Self::Duplicate(what),
            other => Self::Repository(other),
        }
    }
}

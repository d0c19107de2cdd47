//! Seed the catalog from a YAML file.
//!
//! Categories are matched by name and products by SKU, so the same file can be
//! applied repeatedly: existing rows are updated in place, new ones created.
//! Images are only attached to products created by this run.
//!
//! ```yaml
//! categories:
//!   - name: Mugs
//!     description: Stoneware and enamel
//!     products:
//!       - name: Enamel Camp Mug
//!         sku: MUG-ENAMEL-01
//!         price: "14.50"
//!         stock: 40
//!         images:
//!           - url: https://cdn.example.com/mug.jpg
//!             is_primary: true
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use bazaar_api::db::{CategoryRepository, NewProduct, ProductChanges, ProductRepository};
use bazaar_core::CategoryId;

use super::connect;

/// Root of the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<SeedImage>,
}

#[derive(Debug, Deserialize)]
pub struct SeedImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

const fn default_true() -> bool {
    true
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub categories_existing: usize,
    pub products_created: usize,
    pub products_updated: usize,
    pub images_added: usize,
}

/// Check the whole file before touching the database.
///
/// Returns one message per problem; empty means valid.
#[must_use]
pub fn validate_catalog(catalog: &SeedCatalog) -> Vec<String> {
    let mut errors = Vec::new();
    let mut category_names = HashSet::new();
    let mut skus = HashSet::new();

    for category in &catalog.categories {
        let name = category.name.trim();
        if name.is_empty() {
            errors.push("category with a blank name".to_string());
        } else if !category_names.insert(name.to_owned()) {
            errors.push(format!("category '{name}' listed twice"));
        }

        for product in &category.products {
            let sku = product.sku.trim();
            if sku.is_empty() {
                errors.push(format!("product '{}' has a blank sku", product.name));
            } else if !skus.insert(sku.to_owned()) {
                errors.push(format!("sku '{sku}' listed twice"));
            }
            if product.name.trim().is_empty() {
                errors.push(format!("product '{sku}' has a blank name"));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                errors.push(format!("product '{sku}' has a negative price"));
            }
            if product.stock < 0 {
                errors.push(format!("product '{sku}' has negative stock"));
            }
            for image in &product.images {
                let url = image.url.trim();
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    errors.push(format!("product '{sku}' has a non-http image url"));
                }
            }
        }
    }

    errors
}

/// Seed categories and products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation, or if a
/// database operation fails.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: SeedCatalog = serde_yaml::from_str(&content)?;

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = connect().await?;
    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);
    let mut summary = SeedSummary::default();

    for seed in &catalog.categories {
        let name = seed.name.trim();
        let category_id: CategoryId = match categories.get_by_name(name).await? {
            Some(existing) => {
                summary.categories_existing += 1;
                existing.id
            }
            None => {
                summary.categories_created += 1;
                categories
                    .create(name, seed.description.as_deref(), seed.is_active)
                    .await?
                    .id
            }
        };

        for product in &seed.products {
            let sku = product.sku.trim();
            let name = product.name.trim();

            if let Some(id) = products.get_id_by_sku(sku).await? {
                products
                    .update(
                        id,
                        &ProductChanges {
                            category_id: Some(category_id),
                            name: Some(name),
                            description: product.description.as_deref(),
                            price: Some(product.price),
                            stock: Some(product.stock),
                            sku: None,
                            is_active: Some(product.is_active),
                        },
                    )
                    .await?;
                summary.products_updated += 1;
                continue;
            }

            let created = products
                .create(&NewProduct {
                    category_id,
                    name,
                    description: product.description.as_deref(),
                    price: product.price,
                    stock: product.stock,
                    sku,
                    is_active: product.is_active,
                })
                .await?;
            summary.products_created += 1;

            for image in &product.images {
                products
                    .add_image(
                        created.id,
                        image.url.trim(),
                        image.alt_text.as_deref(),
                        image.is_primary,
                    )
                    .await?;
                summary.images_added += 1;
            }
        }
    }

    info!("Seeding complete!");
    info!(
        "  Categories: {} created, {} existing",
        summary.categories_created, summary.categories_existing
    );
    info!(
        "  Products: {} created, {} updated",
        summary.products_created, summary.products_updated
    );
    info!("  Images added: {}", summary.images_added);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
categories:
  - name: Mugs
    description: Stoneware and enamel
    products:
      - name: Enamel Camp Mug
        sku: MUG-ENAMEL-01
        price: "14.50"
        stock: 40
        images:
          - url: https://cdn.example.com/mug.jpg
            is_primary: true
  - name: Tea
    is_active: false
"#;

    #[test]
    fn test_parse_sample() {
        let catalog: SeedCatalog = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(catalog.categories.len(), 2);

        let mugs = &catalog.categories[0];
        assert!(mugs.is_active);
        let mug = &mugs.products[0];
        assert_eq!(mug.price, "14.50".parse::<Decimal>().unwrap());
        assert_eq!(mug.stock, 40);
        assert!(mug.is_active);
        assert!(mug.images[0].is_primary);

        assert!(!catalog.categories[1].is_active);
        assert!(catalog.categories[1].products.is_empty());
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn test_validate_catches_problems() {
        let yaml = r#"
categories:
  - name: Mugs
    products:
      - name: A
        sku: DUP
        price: "-1"
        stock: -2
      - name: " "
        sku: DUP
        price: "3"
        images:
          - url: ftp://example.com/x.png
  - name: Mugs
"#;
        let catalog: SeedCatalog = serde_yaml::from_str(yaml).unwrap();
        let errors = validate_catalog(&catalog);

        assert!(errors.contains(&"category 'Mugs' listed twice".to_string()));
        assert!(errors.contains(&"sku 'DUP' listed twice".to_string()));
        assert!(errors.contains(&"product 'DUP' has a negative price".to_string()));
        assert!(errors.contains(&"product 'DUP' has negative stock".to_string()));
        assert!(errors.contains(&"product 'DUP' has a blank name".to_string()));
        assert!(errors.contains(&"product 'DUP' has a non-http image url".to_string()));
    }
}

//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Stock Is Off Limits Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Writes product.stock?                            │
//! │                                                                         │
//! │  ProductRepository::insert   → sets the INITIAL stock only             │
//! │  ProductRepository::update   → name, price, thresholds... NOT stock    │
//! │  MovementRepository::record  → the ONLY path that changes stock        │
//! │                                                                         │
//! │  This is what keeps the ledger honest: stock and movement history      │
//! │  cannot diverge, because nothing else is allowed to touch stock.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const PRODUCT_COLUMNS: &str =
    "id, name, code, description, photo, price_cents, stock, stock_min, stock_max, \
     created_at, updated_at";

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// The only place an initial stock value enters the system; every later
    /// change goes through the movement ledger.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(DbError::UniqueViolation)` - name or code already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, code, description, photo,
                price_cents, stock, stock_min, stock_max,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.description)
        .bind(&product.photo)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.stock_min)
        .bind(product.stock_max)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates a product's descriptive fields.
    ///
    /// Deliberately leaves `stock` alone; see the module header.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                code = ?3,
                description = ?4,
                price_cents = ?5,
                stock_min = ?6,
                stock_max = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_min)
        .bind(product.stock_max)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Stores the media-relative path of a product's photo.
    pub async fn set_photo(&self, id: &str, photo: &str) -> DbResult<()> {
        debug!(id = %id, photo = %photo, "Setting product photo");

        let now = Utc::now();

        let result = sqlx::query("UPDATE products SET photo = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(photo)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// The schema cascades to the product's movements, so the ledger
    /// disappears with the product and can never refer to a ghost.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bodega_core::{DEFAULT_STOCK_MAX, DEFAULT_STOCK_MIN};

    fn sample_product(name: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: name.to_string(),
            code: None,
            description: None,
            photo: None,
            price_cents: 2000,
            stock,
            stock_min: DEFAULT_STOCK_MIN,
            stock_max: DEFAULT_STOCK_MAX,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Coca Cola", 10);
        repo.insert(&product).await.unwrap();

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Coca Cola");
        assert_eq!(fetched.stock, 10);
        assert_eq!(fetched.stock_min, DEFAULT_STOCK_MIN);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("Coca Cola", 10)).await.unwrap();
        let err = repo
            .insert(&sample_product("Coca Cola", 5))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref field } if field.contains("name")));
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("Sabritas", 3)).await.unwrap();
        repo.insert(&sample_product("Agua", 7)).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Agua", "Sabritas"]);
    }

    #[tokio::test]
    async fn test_update_leaves_stock_alone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut product = sample_product("Coca Cola", 10);
        repo.insert(&product).await.unwrap();

        product.name = "Coca Cola 600ml".to_string();
        product.stock = 999; // must be ignored
        repo.update(&product).await.unwrap();

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Coca Cola 600ml");
        assert_eq!(fetched.stock, 10);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Fantasma", 1);
        let err = repo.update(&product).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Coca Cola", 10);
        repo.insert(&product).await.unwrap();
        repo.delete(&product.id).await.unwrap();

        assert!(repo.get_by_id(&product.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&product.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}

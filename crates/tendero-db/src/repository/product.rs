//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing and lookup with the category name joined in
//! - CRUD, resolving the category name through `ensure_category`
//! - Low-stock listing and the inventory valuation
//!
//! ## Stock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Who changes products.stock?                                            │
//! │                                                                         │
//! │  insert / update  → absolute value typed by the user                    │
//! │  create_sale      → stock - quantity   (guarded: stock >= quantity)     │
//! │  delete_sale      → stock + quantity   (per line with a product)        │
//! │  delete_sale_item → stock + quantity                                    │
//! │                                                                         │
//! │  Sales only ever apply deltas, never absolute values.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::begin_write;
use super::category::ensure_category;
use crate::error::{DbError, DbResult};
use tendero_core::validation::{validate_product_input, validate_search_term};
use tendero_core::{CoreError, InventoryReport, Product, ProductInput};

/// Column list shared by every product read. Category name comes from the
/// join; it is never stored on the product.
const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id,
        p.code,
        p.name,
        p.category_id,
        c.name AS category_name,
        p.purchase_price_cents,
        p.sale_price_cents,
        p.special_price_cents,
        p.stock,
        p.min_stock
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let results = repo.list(Some("arroz")).await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by name.
    ///
    /// ## Arguments
    /// * `search` - Optional substring of the name or code
    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Product>> {
        let search = validate_search_term(search)?;

        debug!(search = ?search, "Listing products");

        let sql = format!(
            "{PRODUCT_SELECT} \
             WHERE ?1 IS NULL OR p.name LIKE '%' || ?1 || '%' OR p.code LIKE '%' || ?1 || '%' \
             ORDER BY p.name COLLATE NOCASE"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(search)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        fetch_product(&self.pool, id).await
    }

    /// Gets a product by its code (e.g. "ARZ-500").
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.code = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// The category name, if any, is resolved (and created) in the same
    /// transaction as the insert.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(DbError::UniqueViolation)` - code already exists
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        validate_product_input(input)?;

        let code = input.code.trim();
        debug!(code = %code, "Inserting product");

        let mut tx = begin_write(&self.pool).await?;

        let category_id = ensure_category(&mut tx, input.category.as_deref()).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                code, name, category_id,
                purchase_price_cents, sale_price_cents, special_price_cents,
                stock, min_stock
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(code)
        .bind(input.name.trim())
        .bind(category_id)
        .bind(input.purchase_price_cents)
        .bind(input.sale_price_cents)
        .bind(input.special_price_cents)
        .bind(input.stock)
        .bind(input.min_stock)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_value(code))?;

        let id = result.last_insert_rowid();
        let product = fetch_product(&mut *tx, id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;

        tx.commit().await?;

        info!(product_id = id, code = %code, "Product created");
        Ok(product)
    }

    /// Replaces every field of an existing product, stock included.
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        validate_product_input(input)?;

        let code = input.code.trim();
        debug!(product_id = id, "Updating product");

        let mut tx = begin_write(&self.pool).await?;

        let category_id = ensure_category(&mut tx, input.category.as_deref()).await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                code = ?2,
                name = ?3,
                category_id = ?4,
                purchase_price_cents = ?5,
                sale_price_cents = ?6,
                special_price_cents = ?7,
                stock = ?8,
                min_stock = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(input.name.trim())
        .bind(category_id)
        .bind(input.purchase_price_cents)
        .bind(input.sale_price_cents)
        .bind(input.special_price_cents)
        .bind(input.stock)
        .bind(input.min_stock)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_value(code))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id).into());
        }

        let product = fetch_product(&mut *tx, id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;

        tx.commit().await?;
        Ok(product)
    }

    /// Deletes a product.
    ///
    /// Sale and quote lines keep their name/code/price snapshot; their
    /// product reference is set to NULL by the schema.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id).into());
        }

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Products at or below their reorder threshold, lowest stock first.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.stock <= p.min_stock ORDER BY p.stock, p.name");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Every product with its stock valuation, ordered by category then
    /// name.
    pub async fn inventory(&self) -> DbResult<InventoryReport> {
        let sql = format!("{PRODUCT_SELECT} ORDER BY c.name, p.name");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(InventoryReport::from_products(products))
    }
}

/// Reads one product on any executor (pool or open transaction).
pub(crate) async fn fetch_product<'e, E>(executor: E, id: i64) -> DbResult<Option<Product>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?1");

    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(product)
}

/// Applies a stock delta inside a sale transaction.
///
/// A negative delta only applies when enough stock is on hand; returns
/// whether a row was changed.
pub(crate) async fn adjust_stock(conn: &mut SqliteConnection, id: i64, delta: i64) -> DbResult<bool> {
    debug!(product_id = id, delta = delta, "Adjusting stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + ?2
        WHERE id = ?1 AND stock + ?2 >= 0
        "#,
    )
    .bind(id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tendero_core::error::ErrorKind;

    fn rice() -> ProductInput {
        ProductInput {
            code: "A1".to_string(),
            name: "Arroz 1kg".to_string(),
            category: Some("Granos".to_string()),
            purchase_price_cents: 60,
            sale_price_cents: 100,
            stock: 10,
            min_stock: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_resolves_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&rice()).await.unwrap();
        assert_eq!(product.category_name.as_deref(), Some("Granos"));

        let mut other = rice();
        other.code = "A2".to_string();
        let second = repo.insert(&other).await.unwrap();
        assert_eq!(second.category_id, product.category_id);
        assert_eq!(db.categories().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&rice()).await.unwrap();
        let err = repo.insert(&rice()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }

    #[tokio::test]
    async fn test_update_clears_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&rice()).await.unwrap();
        let mut input = rice();
        input.category = None;
        input.stock = 1;

        let updated = repo.update(product.id, &input).await.unwrap();
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.category_name, None);
        assert!(updated.is_low_stock());

        let low = repo.low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let product = db.products().insert(&rice()).await.unwrap();
        let category_id = product.category_id.unwrap();
        db.categories().delete(category_id).await.unwrap();

        let product = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(product.category_id, None);
    }

    #[tokio::test]
    async fn test_inventory_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products().insert(&rice()).await.unwrap();

        let report = db.products().inventory().await.unwrap();
        assert_eq!(report.total_units, 10);
        assert_eq!(report.total_cost_cents, 600);
        assert_eq!(report.total_retail_cents, 1000);
    }

    #[tokio::test]
    async fn test_adjust_stock_never_negative() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().insert(&rice()).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(adjust_stock(&mut conn, product.id, -10).await.unwrap());
        assert!(!adjust_stock(&mut conn, product.id, -1).await.unwrap());
        assert!(adjust_stock(&mut conn, product.id, 3).await.unwrap());
        drop(conn);

        let product = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(product.stock, 3);
    }
}

//! # Product Commands
//!
//! Catalog maintenance plus the two stock views: low stock and the
//! inventory export.
//!
//! ## Category Resolution
//! ```text
//! add_product({ code: "A1", category: "Bebidas", ... })
//!      │
//!      ▼
//! ensure category "Bebidas"  ── exists? ──► reuse its id
//!      │                        no
//!      ▼
//! insert category, use new id    (blank name → uncategorized)
//! ```

use tracing::{debug, info};

use super::CreatedResponse;
use crate::error::ApiResponse;
use crate::state::DbState;
use tendero_core::{CoreError, InventoryReport, Product, ProductInput};

/// Lists products by name. `search` matches name or code.
pub async fn get_products(db: &DbState, search: Option<String>) -> ApiResponse<Vec<Product>> {
    debug!(search = ?search, "get_products command");
    let result = db.inner().products().list(search.as_deref()).await;
    ApiResponse::from_result(result, "Products loaded")
}

pub async fn get_product(db: &DbState, id: i64) -> ApiResponse<Product> {
    debug!(id = %id, "get_product command");
    let result = db
        .inner()
        .products()
        .get_by_id(id)
        .await
        .and_then(|found| found.ok_or_else(|| CoreError::ProductNotFound(id).into()));
    ApiResponse::from_result(result, "Product loaded")
}

pub async fn add_product(db: &DbState, input: ProductInput) -> ApiResponse<CreatedResponse> {
    debug!(code = %input.code, "add_product command");
    let result = db.inner().products().insert(&input).await;
    ApiResponse::from_result(result.map(|p| CreatedResponse { id: p.id }), "Product added")
}

pub async fn update_product(db: &DbState, id: i64, input: ProductInput) -> ApiResponse<Product> {
    debug!(id = %id, code = %input.code, "update_product command");
    let result = db.inner().products().update(id, &input).await;
    ApiResponse::from_result(result, "Product updated")
}

/// Deletes a product. Sale and quote lines keep their snapshots.
pub async fn delete_product(db: &DbState, id: i64) -> ApiResponse<()> {
    debug!(id = %id, "delete_product command");
    let result = db.inner().products().delete(id).await;
    ApiResponse::from_result(result, "Product deleted")
}

/// Products at or below their minimum stock.
pub async fn get_low_stock_products(db: &DbState) -> ApiResponse<Vec<Product>> {
    debug!("get_low_stock_products command");
    let result = db.inner().products().low_stock().await;
    if let Ok(products) = &result {
        info!(count = products.len(), "Low stock products");
    }
    ApiResponse::from_result(result, "Low stock products loaded")
}

/// Data for the inventory export: every product plus stock totals.
pub async fn get_inventory(db: &DbState) -> ApiResponse<InventoryReport> {
    debug!("get_inventory command");
    let result = db.inner().products().inventory().await;
    ApiResponse::from_result(result, "Inventory loaded")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_with_category() {
        let db = testing::db().await;

        let created = add_product(
            &db,
            ProductInput {
                code: "B1".to_string(),
                name: "Agua".to_string(),
                category: Some("Bebidas".to_string()),
                sale_price_cents: 50,
                stock: 2,
                min_stock: 3,
                ..Default::default()
            },
        )
        .await;
        let id = created.data.unwrap().id;

        let product = get_product(&db, id).await.data.unwrap();
        assert_eq!(product.category_name.as_deref(), Some("Bebidas"));

        let low = get_low_stock_products(&db).await.data.unwrap();
        assert_eq!(low.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let db = testing::db().await;
        testing::with_product(&db).await;

        let response = add_product(
            &db,
            ProductInput {
                code: "A1".to_string(),
                name: "Otro".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(!response.success);
        assert_eq!(response.code, Some(ErrorCode::ConstraintViolation));
    }

    #[tokio::test]
    async fn test_inventory_and_delete() {
        let db = testing::db().await;
        let id = testing::with_product(&db).await;

        let inventory = get_inventory(&db).await.data.unwrap();
        assert_eq!(inventory.total_units, 10);

        assert!(delete_product(&db, id).await.success);
        assert_eq!(get_product(&db, id).await.code, Some(ErrorCode::NotFound));
    }
}

//! # Sale Commands
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(request)                                                   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  SaleRepository::create  ── one transaction ──────────────────────────┐ │
//! │     │ check lines & stock → snapshot → settle → FACT-NNN → decrement  │ │
//! │     ▼                                                                 │ │
//! │  { success: true, data: { id } }     or     { success: false, code }  │ │
//! │                                             (nothing was written)     │ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use super::CreatedResponse;
use crate::error::ApiResponse;
use crate::state::DbState;
use tendero_core::{CoreError, CreateSaleRequest, Sale, SaleItem, SaleWithItems};

/// Creates a sale. Cash sales are settled in full; credit sales record
/// the initial payment and the remaining balance.
pub async fn create_sale(db: &DbState, request: CreateSaleRequest) -> ApiResponse<CreatedResponse> {
    debug!(
        lines = request.items.len(),
        sale_type = ?request.sale_type,
        client_id = ?request.client_id,
        "create_sale command"
    );

    let result = db.inner().sales().create(&request).await;
    if let Ok(id) = &result {
        info!(sale_id = %id, "create_sale succeeded");
    }
    ApiResponse::from_result(result.map(|id| CreatedResponse { id }), "Sale created")
}

/// All sales with their lines, newest first.
pub async fn get_sales(db: &DbState) -> ApiResponse<Vec<SaleWithItems>> {
    debug!("get_sales command");
    ApiResponse::from_result(db.inner().sales().list().await, "Sales loaded")
}

pub async fn get_sale(db: &DbState, id: i64) -> ApiResponse<SaleWithItems> {
    debug!(id = %id, "get_sale command");
    let result = db
        .inner()
        .sales()
        .get_with_items(id)
        .await
        .and_then(|found| found.ok_or_else(|| CoreError::SaleNotFound(id).into()));
    ApiResponse::from_result(result, "Sale loaded")
}

pub async fn get_sale_items(db: &DbState, sale_id: i64) -> ApiResponse<Vec<SaleItem>> {
    debug!(sale_id = %sale_id, "get_sale_items command");
    ApiResponse::from_result(db.inner().sales().items(sale_id).await, "Sale items loaded")
}

/// Deletes a sale and returns its units to stock.
pub async fn delete_sale(db: &DbState, sale_id: i64) -> ApiResponse<()> {
    debug!(sale_id = %sale_id, "delete_sale command");
    let result = db.inner().sales().delete(sale_id).await;
    ApiResponse::from_result(result, "Sale deleted")
}

/// Deletes one line; the sale total and balance are recomputed.
pub async fn delete_sale_item(db: &DbState, item_id: i64) -> ApiResponse<Sale> {
    debug!(item_id = %item_id, "delete_sale_item command");
    let result = db.inner().sales().delete_item(item_id).await;
    ApiResponse::from_result(result, "Sale item deleted")
}

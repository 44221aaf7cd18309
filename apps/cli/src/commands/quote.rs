//! # Quote Commands
//!
//! ## Quote Lifecycle
//! ```text
//!   create_quote ──► pending ──► approve_quote ──► approved (+ sale_id)
//!        │              │
//!        │              └──► delete_quote
//!        └── stock untouched                 stock decremented by the sale
//! ```

use tracing::{debug, info};

use super::{ApprovedResponse, CreatedResponse};
use crate::error::ApiResponse;
use crate::state::DbState;
use tendero_core::{CoreError, CreateQuoteRequest, QuoteItem, QuoteWithItems};

pub async fn create_quote(db: &DbState, request: CreateQuoteRequest) -> ApiResponse<CreatedResponse> {
    debug!(
        lines = request.items.len(),
        client_id = ?request.client_id,
        "create_quote command"
    );
    let result = db.inner().quotes().create(&request).await;
    ApiResponse::from_result(result.map(|id| CreatedResponse { id }), "Quote created")
}

/// All quotes with their lines, newest first.
pub async fn get_quotes(db: &DbState) -> ApiResponse<Vec<QuoteWithItems>> {
    debug!("get_quotes command");
    ApiResponse::from_result(db.inner().quotes().list().await, "Quotes loaded")
}

pub async fn get_quote(db: &DbState, id: i64) -> ApiResponse<QuoteWithItems> {
    debug!(id = %id, "get_quote command");
    let result = db
        .inner()
        .quotes()
        .get_with_items(id)
        .await
        .and_then(|found| found.ok_or_else(|| CoreError::QuoteNotFound(id).into()));
    ApiResponse::from_result(result, "Quote loaded")
}

pub async fn get_quote_items(db: &DbState, quote_id: i64) -> ApiResponse<Vec<QuoteItem>> {
    debug!(quote_id = %quote_id, "get_quote_items command");
    ApiResponse::from_result(db.inner().quotes().items(quote_id).await, "Quote items loaded")
}

/// Turns a pending quote into a cash sale.
pub async fn approve_quote(db: &DbState, quote_id: i64) -> ApiResponse<ApprovedResponse> {
    debug!(quote_id = %quote_id, "approve_quote command");
    let result = db.inner().quotes().approve(quote_id).await;
    if let Ok(sale_id) = &result {
        info!(quote_id = %quote_id, sale_id = %sale_id, "approve_quote succeeded");
    }
    ApiResponse::from_result(
        result.map(|sale_id| ApprovedResponse { sale_id }),
        "Quote approved",
    )
}

pub async fn delete_quote(db: &DbState, quote_id: i64) -> ApiResponse<()> {
    debug!(quote_id = %quote_id, "delete_quote command");
    let result = db.inner().quotes().delete(quote_id).await;
    ApiResponse::from_result(result, "Quote deleted")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{product, testing};
    use crate::error::ErrorCode;
    use tendero_core::QuoteLineRequest;

    fn request(product_id: i64, quantity: i64) -> CreateQuoteRequest {
        CreateQuoteRequest {
            client_id: None,
            items: vec![QuoteLineRequest {
                product_id: Some(product_id),
                quantity,
                ..Default::default()
            }],
        }
    }

    #[tokio::test]
    async fn test_approve_moves_stock_once() {
        let db = testing::db().await;
        let product_id = testing::with_product(&db).await;

        let quote_id = create_quote(&db, request(product_id, 4)).await.data.unwrap().id;
        let stock = product::get_product(&db, product_id).await.data.unwrap().stock;
        assert_eq!(stock, 10);

        let approved = approve_quote(&db, quote_id).await;
        assert!(approved.success, "{}", approved.message);
        let stock = product::get_product(&db, product_id).await.data.unwrap().stock;
        assert_eq!(stock, 6);

        let quote = get_quote(&db, quote_id).await.data.unwrap();
        assert_eq!(quote.quote.sale_id, Some(approved.data.unwrap().sale_id));

        let again = approve_quote(&db, quote_id).await;
        assert_eq!(again.code, Some(ErrorCode::InvalidState));
    }

    #[tokio::test]
    async fn test_errors() {
        let db = testing::db().await;

        let empty = create_quote(&db, CreateQuoteRequest::default()).await;
        assert_eq!(empty.code, Some(ErrorCode::EmptyInput));

        assert_eq!(approve_quote(&db, 1).await.code, Some(ErrorCode::NotFound));
        assert_eq!(delete_quote(&db, 1).await.code, Some(ErrorCode::NotFound));
    }
}

//! # Credit Commands
//!
//! Open balances and the payments that close them.

use tracing::debug;

use crate::error::ApiResponse;
use crate::state::DbState;
use tendero_core::{CreditSummary, Sale};

/// Credit sales with an open balance, optionally filtered by client name.
pub async fn get_credits(db: &DbState, search: Option<String>) -> ApiResponse<Vec<CreditSummary>> {
    debug!(search = ?search, "get_credits command");
    let result = db.inner().sales().credits(search.as_deref()).await;
    ApiResponse::from_result(result, "Credits loaded")
}

/// Applies a payment in cents. Returns the sale with its new balance.
pub async fn add_credit_payment(db: &DbState, sale_id: i64, amount_cents: i64) -> ApiResponse<Sale> {
    debug!(sale_id = %sale_id, amount = %amount_cents, "add_credit_payment command");
    let result = db.inner().sales().add_payment(sale_id, amount_cents).await;
    ApiResponse::from_result(result, "Payment recorded")
}

pub async fn mark_credit_as_paid(db: &DbState, sale_id: i64) -> ApiResponse<Sale> {
    debug!(sale_id = %sale_id, "mark_credit_as_paid command");
    let result = db.inner().sales().mark_paid(sale_id).await;
    ApiResponse::from_result(result, "Credit marked as paid")
}

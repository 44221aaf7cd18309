//! # System Commands
//!
//! Dashboard counts, last issued document numbers, the adapter
//! configuration and the destructive reset.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiResponse;
use crate::state::{ConfigState, DbState};
use tendero_core::DashboardData;
use tendero_db::DbResult;

/// Last issued invoice and quote numbers. `None` when nothing was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastNumbersResponse {
    pub last_invoice_number: Option<String>,
    pub last_quote_number: Option<String>,
}

pub async fn get_dashboard_data(db: &DbState) -> ApiResponse<DashboardData> {
    debug!("get_dashboard_data command");
    ApiResponse::from_result(db.inner().dashboard().data().await, "Dashboard loaded")
}

/// Peeks at the numbering without issuing anything.
pub async fn get_last_numbers(db: &DbState) -> ApiResponse<LastNumbersResponse> {
    debug!("get_last_numbers command");

    async fn load(db: &DbState) -> DbResult<LastNumbersResponse> {
        let sequences = db.inner().sequences();
        Ok(LastNumbersResponse {
            last_invoice_number: sequences.last_invoice_number().await?,
            last_quote_number: sequences.last_quote_number().await?,
        })
    }

    ApiResponse::from_result(load(db).await, "Last numbers loaded")
}

/// Gets the current adapter configuration.
pub fn get_config(config: &ConfigState) -> ApiResponse<ConfigState> {
    debug!("get_config command");
    ApiResponse::ok("Configuration loaded", config.clone())
}

/// Deletes every client, product, category, sale and quote and restarts
/// numbering. The company settings row is kept, blanked.
pub async fn reset_database(db: &DbState) -> ApiResponse<()> {
    warn!("reset_database command");
    ApiResponse::from_result(db.inner().reset().await, "Database reset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{sale, testing};
    use tendero_core::{CreateSaleRequest, SaleLineRequest};

    #[tokio::test]
    async fn test_reset_restarts_numbering() {
        let db = testing::db().await;
        let product_id = testing::with_product(&db).await;

        let request = CreateSaleRequest {
            items: vec![SaleLineRequest {
                product_id,
                quantity: 1,
                price_cents: None,
            }],
            ..Default::default()
        };
        assert!(sale::create_sale(&db, request).await.success);

        let numbers = get_last_numbers(&db).await.data.unwrap();
        assert_eq!(numbers.last_invoice_number.as_deref(), Some("FACT-001"));
        assert_eq!(numbers.last_quote_number, None);
        assert_eq!(get_dashboard_data(&db).await.data.unwrap().sales, 1);

        assert!(reset_database(&db).await.success);

        assert_eq!(get_dashboard_data(&db).await.data.unwrap(), DashboardData::default());
        let numbers = get_last_numbers(&db).await.data.unwrap();
        assert_eq!(numbers.last_invoice_number, None);
    }

    #[test]
    fn test_get_config() {
        let response = get_config(&ConfigState::default());
        assert!(response.success);
        assert_eq!(response.data.unwrap().max_connections, 5);
    }
}

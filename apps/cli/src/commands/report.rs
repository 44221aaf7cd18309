//! # Report Commands

use tracing::debug;

use crate::error::{ApiError, ApiResponse};
use crate::state::DbState;
use tendero_core::report::{parse_report_date, ReportGranularity, SalesReport};

/// Sales between two `YYYY-MM-DD` dates (both inclusive), grouped by
/// `granularity`.
pub async fn sales_report(
    db: &DbState,
    start_date: &str,
    end_date: &str,
    granularity: ReportGranularity,
) -> ApiResponse<SalesReport> {
    debug!(
        start = %start_date,
        end = %end_date,
        granularity = %granularity,
        "sales_report command"
    );

    let bounds = parse_report_date("start_date", start_date)
        .and_then(|start| Ok((start, parse_report_date("end_date", end_date)?)))
        .map_err(|e| ApiError::validation(e.to_string()));

    let (start, end) = match bounds {
        Ok(bounds) => bounds,
        Err(e) => return ApiResponse::err(e),
    };

    let result = db.inner().reports().sales_report(start, end, granularity).await;
    ApiResponse::from_result(result, "Report generated")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{sale, testing};
    use crate::error::ErrorCode;
    use tendero_core::{CreateSaleRequest, SaleLineRequest};

    #[tokio::test]
    async fn test_bad_dates() {
        let db = testing::db().await;

        let response = sales_report(&db, "2024-13-01", "2024-12-31", ReportGranularity::Daily).await;
        assert_eq!(response.code, Some(ErrorCode::ValidationError));

        let response = sales_report(&db, "2024-02-01", "2024-01-01", ReportGranularity::Daily).await;
        assert_eq!(response.code, Some(ErrorCode::ValidationError));
    }

    #[tokio::test]
    async fn test_report_includes_today() {
        let db = testing::db().await;
        let product_id = testing::with_product(&db).await;

        let request = CreateSaleRequest {
            items: vec![SaleLineRequest {
                product_id,
                quantity: 2,
                price_cents: None,
            }],
            ..Default::default()
        };
        assert!(sale::create_sale(&db, request).await.success);

        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        let report = sales_report(&db, &today, &today, ReportGranularity::Monthly)
            .await
            .data
            .unwrap();

        assert_eq!(report.periods.len(), 1);
        assert_eq!(report.grand_total_cents, 200);
        assert_eq!(report.periods[0].items.len(), 1);
    }
}

//! # Report Repository
//!
//! Reads the sales of a date range and hands them to the grouping in
//! `tendero_core::report`. Read-only.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use super::sale::SaleRepository;
use crate::error::DbResult;
use tendero_core::report::{group_sales, report_bounds, ReportGranularity, SalesReport};

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sales between `start 00:00:00` and `end 23:59:59`, grouped by
    /// `granularity`.
    ///
    /// ## Errors
    /// `InvalidDateRange` when `start > end`.
    pub async fn sales_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        granularity: ReportGranularity,
    ) -> DbResult<SalesReport> {
        let (from, to) = report_bounds(start, end)?;

        let sales = SaleRepository::new(self.pool.clone())
            .in_range(from, to)
            .await?;

        debug!(
            start = %start,
            end = %end,
            granularity = %granularity,
            sales = sales.len(),
            "Building sales report"
        );

        Ok(group_sales(start, end, granularity, sales)?)
    }
}

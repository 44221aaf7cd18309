//! # Sales Report Grouping
//!
//! Buckets sales by calendar period. The store selects the rows, this
//! module does the grouping.
//!
//! ## Period Labels
//! ```text
//! ┌──────────────┬──────────────┬───────────────────────────────────────────┐
//! │ Granularity  │ Label        │ Notes                                     │
//! ├──────────────┼──────────────┼───────────────────────────────────────────┤
//! │ daily        │ 2024-03-07   │ calendar day of the stored sale date      │
//! │ weekly       │ 2024-W10     │ ISO-8601 week, ISO week-numbering year    │
//! │ monthly      │ 2024-03      │ calendar month                            │
//! └──────────────┴──────────────┴───────────────────────────────────────────┘
//! ```
//!
//! All three label formats are zero-padded, so lexical order is
//! chronological order.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Sale, SaleItem, SaleWithItems};

/// Date format accepted for report bounds.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Granularity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportGranularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ReportGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportGranularity::Daily => "daily",
            ReportGranularity::Weekly => "weekly",
            ReportGranularity::Monthly => "monthly",
        }
    }

    /// Label of the period containing `date`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use tendero_core::report::ReportGranularity;
    ///
    /// let d = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
    /// assert_eq!(ReportGranularity::Daily.label(d), "2024-12-30");
    /// assert_eq!(ReportGranularity::Weekly.label(d), "2025-W01");
    /// assert_eq!(ReportGranularity::Monthly.label(d), "2024-12");
    /// ```
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            ReportGranularity::Daily => date.format(REPORT_DATE_FORMAT).to_string(),
            ReportGranularity::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            ReportGranularity::Monthly => format!("{}-{:02}", date.year(), date.month()),
        }
    }
}

impl fmt::Display for ReportGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportGranularity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(ReportGranularity::Daily),
            "weekly" | "week" => Ok(ReportGranularity::Weekly),
            "monthly" | "month" => Ok(ReportGranularity::Monthly),
            other => Err(ValidationError::InvalidFormat {
                field: "granularity".to_string(),
                reason: format!("'{}' is not one of daily, weekly, monthly", other),
            }),
        }
    }
}

// =============================================================================
// Report Types
// =============================================================================

/// One bucket of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportPeriod {
    pub label: String,
    pub total_cents: i64,
    pub sales: Vec<Sale>,
    /// Lines of every sale in the period, concatenated.
    pub items: Vec<SaleItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub granularity: ReportGranularity,
    /// Ascending by label.
    pub periods: Vec<ReportPeriod>,
    pub grand_total_cents: i64,
}

// =============================================================================
// Range Handling
// =============================================================================

/// Parses a `YYYY-MM-DD` report bound.
pub fn parse_report_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), REPORT_DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD: {}", e),
        }
    })
}

/// Inclusive timestamp bounds covering whole days `start..=end`.
///
/// ## Errors
/// `InvalidDateRange` when `start` is after `end`.
pub fn report_bounds(start: NaiveDate, end: NaiveDate) -> CoreResult<(NaiveDateTime, NaiveDateTime)> {
    if start > end {
        return Err(CoreError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let from = start.and_time(NaiveTime::MIN);
    // 23:59:59 always exists on a NaiveDate.
    let to = end.and_hms_opt(23, 59, 59).unwrap_or(from);

    Ok((from, to))
}

// =============================================================================
// Grouping
// =============================================================================

/// Groups sales into periods.
///
/// Sales outside `start..=end` are ignored, so callers may pass a superset.
pub fn group_sales(
    start: NaiveDate,
    end: NaiveDate,
    granularity: ReportGranularity,
    sales: Vec<SaleWithItems>,
) -> CoreResult<SalesReport> {
    let (from, to) = report_bounds(start, end)?;

    let mut buckets: BTreeMap<String, ReportPeriod> = BTreeMap::new();

    for SaleWithItems { sale, items } in sales {
        if sale.sale_date < from || sale.sale_date > to {
            continue;
        }

        let label = granularity.label(sale.sale_date.date());
        let period = buckets.entry(label.clone()).or_insert_with(|| ReportPeriod {
            label,
            total_cents: 0,
            sales: Vec::new(),
            items: Vec::new(),
        });

        period.total_cents += sale.total_cents;
        period.sales.push(sale);
        period.items.extend(items);
    }

    let periods: Vec<ReportPeriod> = buckets.into_values().collect();
    let grand_total: Money = periods
        .iter()
        .map(|p| Money::from_cents(p.total_cents))
        .sum();

    Ok(SalesReport {
        start_date: start,
        end_date: end,
        granularity,
        periods,
        grand_total_cents: grand_total.cents(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(id: i64, at: NaiveDateTime, total: i64) -> SaleWithItems {
        SaleWithItems {
            sale: Sale {
                id,
                client_id: None,
                client_name: None,
                sale_date: at,
                total_cents: total,
                invoice_number: Some(format!("FACT-{:03}", id)),
                sale_type: SaleType::Cash,
                paid_cents: total,
                outstanding_cents: 0,
            },
            items: vec![SaleItem {
                id: id * 10,
                sale_id: id,
                product_id: Some(1),
                product_name: "Arroz".to_string(),
                product_code: "A1".to_string(),
                quantity: 1,
                price_cents: total,
                subtotal_cents: total,
            }],
        }
    }

    #[test]
    fn test_parse_granularity() {
        assert_eq!("weekly".parse::<ReportGranularity>().unwrap(), ReportGranularity::Weekly);
        assert_eq!(" Monthly ".parse::<ReportGranularity>().unwrap(), ReportGranularity::Monthly);
        assert!("yearly".parse::<ReportGranularity>().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = report_bounds(date(2024, 3, 2), date(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_bounds_cover_whole_days() {
        let (from, to) = report_bounds(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(from.to_string(), "2024-03-01 00:00:00");
        assert_eq!(to.to_string(), "2024-03-01 23:59:59");
    }

    #[test]
    fn test_daily_grouping_ascending() {
        let sales = vec![
            sale(2, date(2024, 3, 2).and_hms_opt(9, 0, 0).unwrap(), 500),
            sale(1, date(2024, 3, 1).and_hms_opt(23, 59, 59).unwrap(), 300),
            sale(3, date(2024, 3, 2).and_hms_opt(18, 30, 0).unwrap(), 200),
        ];

        let report =
            group_sales(date(2024, 3, 1), date(2024, 3, 2), ReportGranularity::Daily, sales)
                .unwrap();

        let labels: Vec<_> = report.periods.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2024-03-01", "2024-03-02"]);
        assert_eq!(report.periods[1].total_cents, 700);
        assert_eq!(report.periods[1].sales.len(), 2);
        assert_eq!(report.periods[1].items.len(), 2);
        assert_eq!(report.grand_total_cents, 1000);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let sales = vec![
            sale(1, date(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap(), 300),
            sale(2, date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap(), 100),
        ];

        let report =
            group_sales(date(2024, 3, 1), date(2024, 3, 31), ReportGranularity::Monthly, sales)
                .unwrap();

        assert_eq!(report.periods.len(), 1);
        assert_eq!(report.periods[0].label, "2024-03");
        assert_eq!(report.grand_total_cents, 100);
    }

    #[test]
    fn test_weekly_uses_iso_year() {
        let sales = vec![
            sale(1, date(2020, 12, 31).and_hms_opt(10, 0, 0).unwrap(), 100),
            sale(2, date(2021, 1, 3).and_hms_opt(10, 0, 0).unwrap(), 100),
            sale(3, date(2021, 1, 4).and_hms_opt(10, 0, 0).unwrap(), 100),
        ];

        let report =
            group_sales(date(2020, 12, 1), date(2021, 1, 31), ReportGranularity::Weekly, sales)
                .unwrap();

        let labels: Vec<_> = report.periods.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2020-W53", "2021-W01"]);
        assert_eq!(report.periods[0].sales.len(), 2);
    }

    #[test]
    fn test_empty_report() {
        let report =
            group_sales(date(2024, 1, 1), date(2024, 1, 31), ReportGranularity::Daily, vec![])
                .unwrap();
        assert!(report.periods.is_empty());
        assert_eq!(report.grand_total_cents, 0);
    }
}

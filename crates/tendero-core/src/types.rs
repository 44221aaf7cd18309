//! # Domain Types
//!
//! Core domain types used throughout Tendero.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                 │
//! │  │   Client     │   │   Category   │   │   Product    │                 │
//! │  │  legal_id ◄──┼─U │  name     ◄──┼─U │  code     ◄──┼─U              │
//! │  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘                 │
//! │         │ (set null)       └──(set null)──────┤                         │
//! │         ▼                                     ▼ (set null)              │
//! │  ┌──────────────┐  owns (cascade)  ┌──────────────┐                     │
//! │  │    Sale      │─────────────────►│   SaleItem   │  snapshot of        │
//! │  │ FACT-NNN     │                  │ name/code/   │  name, code, price  │
//! │  │ cash|credit| │                  │ price        │                     │
//! │  │ paid         │                  └──────────────┘                     │
//! │  └──────▲───────┘                                                       │
//! │         │ approve                                                       │
//! │  ┌──────┴───────┐  owns (cascade)  ┌──────────────┐                     │
//! │  │    Quote     │─────────────────►│  QuoteItem   │  no stock effect    │
//! │  │ COT-NNN      │                  └──────────────┘                     │
//! │  └──────────────┘                                                       │
//! │                                                                         │
//! │  U = unique                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity id is a store-assigned integer (`INTEGER PRIMARY KEY
//! AUTOINCREMENT`), monotonic and immutable. Business identifiers
//! (product code, invoice number, ...) are separate columns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Client
// =============================================================================

/// A customer. Sales and quotes reference it weakly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    pub id: i64,
    pub name: String,
    /// National id card or tax id. Unique.
    pub legal_id: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Payload for creating or updating a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientInput {
    pub name: String,
    pub legal_id: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Only the category reference is persisted; `category_name` is filled in
/// by a join when the product is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Business identifier. Unique.
    pub code: String,

    pub name: String,

    pub category_id: Option<i64>,

    /// Display name of the category (joined, never stored on the product).
    pub category_name: Option<String>,

    /// Cost in cents.
    pub purchase_price_cents: i64,

    /// Regular price in cents. Default line price in a sale.
    pub sale_price_cents: i64,

    /// Alternate/discount price in cents (0 when unused).
    pub special_price_cents: i64,

    /// Units on hand. Mutated only by sales and by explicit edits.
    pub stock: i64,

    /// Reorder threshold.
    pub min_stock: i64,
}

impl Product {
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Checks whether `quantity` units can be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Low stock is derived, never stored.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Payload for creating or updating a product.
///
/// `category` is a name; the store resolves it to a category id,
/// creating the category when it doesn't exist yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub purchase_price_cents: i64,
    #[serde(default)]
    pub sale_price_cents: i64,
    #[serde(default)]
    pub special_price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
}

// =============================================================================
// Sale Type
// =============================================================================

/// How a sale is being settled.
///
/// ## State Machine
/// ```text
///   cash ─────────────────────────────► (terminal)
///
///   credit ──(balance reaches 0)──────► paid (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    /// Paid in full at the counter.
    #[default]
    Cash,
    /// Partially paid, balance outstanding.
    Credit,
    /// A former credit sale whose balance reached zero.
    Paid,
}

impl SaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleType::Cash => "cash",
            SaleType::Credit => "credit",
            SaleType::Paid => "paid",
        }
    }
}

/// Settlement requested when a sale is created.
///
/// `paid` is never requested directly: a credit sale becomes paid when
/// its balance reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTerms {
    #[default]
    Cash,
    Credit,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub client_id: Option<i64>,
    /// Joined from clients; `None` for anonymous sales.
    pub client_name: Option<String>,
    /// Local time, second precision.
    #[ts(as = "String")]
    pub sale_date: NaiveDateTime,
    pub total_cents: i64,
    /// `FACT-NNN`. Assigned inside the creating transaction.
    pub invoice_number: Option<String>,
    pub sale_type: SaleType,
    pub paid_cents: i64,
    pub outstanding_cents: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    #[inline]
    pub fn outstanding(&self) -> Money {
        Money::from_cents(self.outstanding_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line of a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    /// Nulled when the product is deleted.
    pub product_id: Option<i64>,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Product code at time of sale (frozen).
    pub product_code: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub price_cents: i64,
    /// price × quantity.
    pub subtotal_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// A sale together with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleWithItems {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

// =============================================================================
// Sale Requests
// =============================================================================

/// One requested line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineRequest {
    pub product_id: i64,
    pub quantity: i64,
    /// Overrides the product's current sale price (e.g. its special price).
    #[serde(default)]
    pub price_cents: Option<i64>,
}

/// Payload for `create_sale`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateSaleRequest {
    #[serde(default)]
    pub client_id: Option<i64>,
    pub items: Vec<SaleLineRequest>,
    #[serde(default)]
    pub sale_type: PaymentTerms,
    /// Initial payment for credit sales. Ignored for cash sales.
    #[serde(default)]
    pub paid_cents: Option<i64>,
    /// Optional cross-check for credit sales; must equal total - paid.
    #[serde(default)]
    pub outstanding_cents: Option<i64>,
}

// =============================================================================
// Credit
// =============================================================================

/// A credit sale with an open balance, as listed in the credits screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CreditSummary {
    pub sale_id: i64,
    pub invoice_number: Option<String>,
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
    #[ts(as = "String")]
    pub sale_date: NaiveDateTime,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub outstanding_cents: i64,
}

// =============================================================================
// Quote
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Approved,
}

/// A price quote. Mirrors a sale but never touches stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Quote {
    pub id: i64,
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
    #[ts(as = "String")]
    pub quote_date: NaiveDateTime,
    pub total_cents: i64,
    /// `COT-NNN`.
    pub quote_number: Option<String>,
    pub status: QuoteStatus,
    /// Sale produced when the quote was approved.
    pub sale_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct QuoteItem {
    pub id: i64,
    pub quote_id: i64,
    pub product_id: Option<i64>,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub subtotal_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteWithItems {
    pub quote: Quote,
    pub items: Vec<QuoteItem>,
}

/// One requested line of a quote.
///
/// Name, code and price are fallbacks for when the product is gone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteLineRequest {
    #[serde(default)]
    pub product_id: Option<i64>,
    pub quantity: i64,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateQuoteRequest {
    #[serde(default)]
    pub client_id: Option<i64>,
    pub items: Vec<QuoteLineRequest>,
}

// =============================================================================
// Company Settings
// =============================================================================

/// The singleton company profile printed on invoices and quotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompanySettings {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub legal_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub logo_path: Option<String>,
}

// =============================================================================
// Dashboard & Inventory
// =============================================================================

/// Counts shown on the home screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardData {
    pub clients: i64,
    pub products: i64,
    pub sales: i64,
    pub quotes: i64,
    /// Credit sales with an open balance.
    pub pending_credits: i64,
    /// Products at or below their reorder threshold.
    pub low_stock_products: i64,
}

/// The data behind the inventory export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryReport {
    pub products: Vec<Product>,
    pub total_units: i64,
    /// Σ stock × purchase price.
    pub total_cost_cents: i64,
    /// Σ stock × sale price.
    pub total_retail_cents: i64,
}

impl InventoryReport {
    /// Builds the report totals from a product listing.
    pub fn from_products(products: Vec<Product>) -> Self {
        let total_units = products.iter().map(|p| p.stock).sum();
        let total_cost: Money = products
            .iter()
            .map(|p| p.purchase_price().multiply_quantity(p.stock))
            .sum();
        let total_retail: Money = products
            .iter()
            .map(|p| p.sale_price().multiply_quantity(p.stock))
            .sum();

        InventoryReport {
            products,
            total_units,
            total_cost_cents: total_cost.cents(),
            total_retail_cents: total_retail.cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_stock: i64) -> Product {
        Product {
            id: 1,
            code: "A1".to_string(),
            name: "Arroz".to_string(),
            category_id: None,
            category_name: None,
            purchase_price_cents: 60,
            sale_price_cents: 100,
            special_price_cents: 0,
            stock,
            min_stock,
        }
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        assert!(product(3, 3).is_low_stock());
        assert!(product(0, 0).is_low_stock());
        assert!(!product(4, 3).is_low_stock());
    }

    #[test]
    fn test_can_sell() {
        let p = product(3, 0);
        assert!(p.can_sell(3));
        assert!(!p.can_sell(4));
    }

    #[test]
    fn test_sale_type_serde() {
        assert_eq!(serde_json::to_string(&SaleType::Credit).unwrap(), "\"credit\"");
        let terms: PaymentTerms = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(terms, PaymentTerms::Cash);
        assert_eq!(SaleType::Paid.as_str(), "paid");
    }

    #[test]
    fn test_create_sale_request_defaults() {
        let req: CreateSaleRequest =
            serde_json::from_str(r#"{"items":[{"product_id":1,"quantity":3}]}"#).unwrap();
        assert_eq!(req.sale_type, PaymentTerms::Cash);
        assert_eq!(req.client_id, None);
        assert_eq!(req.items[0].price_cents, None);
    }

    #[test]
    fn test_inventory_totals() {
        let report = InventoryReport::from_products(vec![product(10, 0), product(5, 0)]);
        assert_eq!(report.total_units, 15);
        assert_eq!(report.total_cost_cents, 900);
        assert_eq!(report.total_retail_cents, 1500);
    }
}

//! # Commands Module
//!
//! The request/response contract consumed by adapters.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared response DTOs)
//! ├── client.rs    ◄─── Client CRUD
//! ├── category.rs  ◄─── Category CRUD
//! ├── product.rs   ◄─── Product CRUD, low stock, inventory
//! ├── sale.rs      ◄─── Sale creation, listing, deletion
//! ├── credit.rs    ◄─── Credit listing and payments
//! ├── quote.rs     ◄─── Quotes and approval
//! ├── report.rs    ◄─── Sales report
//! ├── settings.rs  ◄─── Company settings
//! └── system.rs    ◄─── Dashboard, document numbers, reset, config
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Command Flow                                      │
//! │                                                                         │
//! │  Adapter (CLI, future UI)                                               │
//! │         │  create_sale(&db, CreateSaleRequest { .. })                   │
//! │         ▼                                                               │
//! │  Command                                                                │
//! │  ├── debug!(...)                                                        │
//! │  ├── db.inner().sales().create(&request).await   → Result<_, DbError>   │
//! │  └── ApiResponse::from_result(result, "Sale created")                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  {success, message, code?, data?}                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take plain values, never touch SQL, and never fail: errors
//! come back as `success: false` envelopes.

use serde::{Deserialize, Serialize};

pub mod category;
pub mod client;
pub mod credit;
pub mod product;
pub mod quote;
pub mod report;
pub mod sale;
pub mod settings;
pub mod system;

/// Returned by commands that create a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub id: i64,
}

/// Returned by `approve_quote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedResponse {
    pub sale_id: i64,
}

//! # Repository Module
//!
//! Database repository implementations for Tendero.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Command (apps/cli)                                                     │
//! │       │                                                                 │
//! │       │  db.sales().create(&request)                                    │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── begin_write(&pool)        BEGIN IMMEDIATE                         │
//! │  ├── insert_sale(&mut *tx, ...)   ← shared with quote approval          │
//! │  │     ├── fetch_product / adjust_stock   (product.rs)                  │
//! │  │     └── next_number                    (sequence.rs)                 │
//! │  └── tx.commit()                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Functions taking `&mut SqliteConnection` run on the caller's           │
//! │  transaction; methods on repositories own their transaction.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`](client::ClientRepository) - Client CRUD
//! - [`CategoryRepository`](category::CategoryRepository) - Categories, ensure-category
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD, low stock, inventory
//! - [`SaleRepository`](sale::SaleRepository) - Sales, line deletion, credits
//! - [`QuoteRepository`](quote::QuoteRepository) - Quotes and approval
//! - [`SettingsRepository`](settings::SettingsRepository) - Company settings
//! - [`ReportRepository`](report::ReportRepository) - Sales report
//! - [`DashboardRepository`](dashboard::DashboardRepository) - Home screen counts
//! - [`SequenceRepository`](sequence::SequenceRepository) - Last issued numbers

pub mod category;
pub mod client;
pub mod dashboard;
pub mod product;
pub mod quote;
pub mod report;
pub mod sale;
pub mod sequence;
pub mod settings;

use chrono::{Local, NaiveDateTime, Timelike};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbResult;

/// Opens a transaction that takes the write lock up front.
///
/// A deferred `BEGIN` that reads before it writes fails with SQLITE_BUSY
/// when another writer commits in between (WAL snapshots can't be
/// upgraded). `BEGIN IMMEDIATE` queues on the busy timeout instead, so
/// concurrent writers run one after the other.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Current local time at second precision, as stored on documents.
pub(crate) fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

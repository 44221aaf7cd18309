//! # tendero-db: Store Layer for Tendero
//!
//! SQLite persistence for clients, categories, products, sales, credits,
//! quotes, the company profile and document numbering. Every mutating
//! operation runs as a single transaction; reads go straight to the pool.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tendero Data Flow                               │
//! │                                                                         │
//! │  Adapter (tendero-cli command)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tendero-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ ProductRepo   │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 001_initial  │   │   │
//! │  │   │ reset()       │    │ QuoteRepo ... │    │ 002_sequences│   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                │                                │   │
//! │  │                                ▼                                │   │
//! │  │                   tendero-core (rules, no I/O)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, repository accessors, reset
//! - [`migrations`] - Embedded schema migrations
//! - [`error`] - Store error type and its mapping to error kinds
//! - [`repository`] - One repository per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tendero_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("tendero.db")).await?;
//!
//! let products = db.products().list(Some("arroz")).await?;
//! let sale = db.sales().create(&request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::client::ClientRepository;
pub use repository::dashboard::DashboardRepository;
pub use repository::product::ProductRepository;
pub use repository::quote::QuoteRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::sequence::{DocumentKind, SequenceRepository};
pub use repository::settings::SettingsRepository;

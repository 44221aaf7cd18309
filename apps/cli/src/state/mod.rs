//! # State Module
//!
//! State shared by every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐      │
//! │  │       ConfigState        │        │         DbState          │      │
//! │  │                          │ opens  │                          │      │
//! │  │  db_path                 │──────► │  Database                │      │
//! │  │  max_connections         │        │  (SQLite pool)           │      │
//! │  │  report_granularity      │        │                          │      │
//! │  └──────────────────────────┘        └──────────────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::ConfigState;
pub use db::{default_database_path, DbState};

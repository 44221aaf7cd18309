//! # Tendero Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            tendero                                      │
//! │                                                                         │
//! │  main.rs ────► builds the Tokio runtime                                 │
//! │                                                                         │
//! │  lib.rs ─────► parses arguments, opens the store, dispatches            │
//! │                                                                         │
//! │  commands/ ──► create_sale, approve_quote, sales_report, ...            │
//! │                                                                         │
//! │  stdout ─────► one JSON envelope {success, message, code?, data?}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    tendero_cli::run().await
}

//! # Tendero CLI Library
//!
//! Command layer and command-line adapter for Tendero.
//!
//! ## Module Organization
//! ```text
//! tendero_cli/
//! ├── lib.rs          ◄─── You are here (argument parsing & dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper, default path
//! │   └── config.rs   ◄─── Configuration from the environment
//! ├── commands/       ◄─── One function per operation, returns ApiResponse
//! └── error.rs        ◄─── ApiError and the response envelope
//! ```
//!
//! ## Output
//! Every invocation prints exactly one JSON envelope on stdout and exits
//! non-zero when `success` is false. Logs go to stderr.
//!
//! ```bash
//! tendero product add --json '{"code":"A1","name":"Arroz","sale_price_cents":100,"stock":10}'
//! tendero sale create --json '{"items":[{"product_id":1,"quantity":3}]}'
//! tendero credit pay 1 5000
//! tendero report --start 2024-01-01 --end 2024-01-31 --granularity weekly
//! ```

pub mod commands;
pub mod error;
pub mod state;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use commands::{category, client, credit, product, quote, report, sale, settings, system};
use error::{ApiError, ApiResponse};
use state::{ConfigState, DbState};
use tendero_core::report::ReportGranularity;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "tendero")]
#[command(version, about = "Point of sale and inventory for small shops", long_about = None)]
pub struct Cli {
    /// Path to the database file (overrides TENDERO_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage clients
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Manage product categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage products and view stock
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Create, inspect and delete sales
    Sale {
        #[command(subcommand)]
        action: SaleAction,
    },

    /// Credit sales with an open balance
    Credit {
        #[command(subcommand)]
        action: CreditAction,
    },

    /// Quotes and their approval
    Quote {
        #[command(subcommand)]
        action: QuoteAction,
    },

    /// Sales report for a date range
    Report {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: String,

        /// daily, weekly or monthly (default from TENDERO_REPORT_GRANULARITY)
        #[arg(long)]
        granularity: Option<ReportGranularity>,
    },

    /// Company profile printed on documents
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Home screen counts
    Dashboard,

    /// Last issued invoice and quote numbers
    Numbers,

    /// Show the effective configuration
    Config,

    /// Delete all business data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClientAction {
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    Get {
        id: i64,
    },
    /// Payload: {"name", "legal_id", "address"?, "email"?, "phone"?}
    Add {
        #[arg(long)]
        json: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        json: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    List,
    Add { name: String },
    Update { id: i64, name: String },
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    Get {
        id: i64,
    },
    /// Payload: {"code", "name", "category"?, "purchase_price_cents"?,
    /// "sale_price_cents"?, "special_price_cents"?, "stock"?, "min_stock"?}
    Add {
        #[arg(long)]
        json: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        json: String,
    },
    Delete {
        id: i64,
    },
    /// Products at or below their minimum stock
    LowStock,
    /// Every product with stock totals
    Inventory,
}

#[derive(Debug, Subcommand)]
pub enum SaleAction {
    /// Payload: {"client_id"?, "items": [{"product_id", "quantity", "price_cents"?}],
    /// "sale_type"?: "cash"|"credit", "paid_cents"?, "outstanding_cents"?}
    Create {
        #[arg(long)]
        json: String,
    },
    List,
    Get {
        id: i64,
    },
    Items {
        sale_id: i64,
    },
    Delete {
        id: i64,
    },
    /// Delete one line of a sale
    DeleteItem {
        item_id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum CreditAction {
    List {
        /// Client name substring
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Record a payment in cents
    Pay {
        sale_id: i64,
        amount_cents: i64,
    },
    MarkPaid {
        sale_id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum QuoteAction {
    /// Payload: {"client_id"?, "items": [{"product_id"?, "quantity",
    /// "price_cents"?, "product_name"?, "product_code"?}]}
    Create {
        #[arg(long)]
        json: String,
    },
    List,
    Get {
        id: i64,
    },
    Items {
        quote_id: i64,
    },
    /// Convert a pending quote into a cash sale
    Approve {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Get,
    /// Payload: {"company_name"?, "legal_id"?, "address"?, "email"?, "phone"?, "logo_path"?}
    Set {
        #[arg(long)]
        json: String,
    },
}

// =============================================================================
// Entry Point
// =============================================================================

/// Parses arguments, opens the store and runs one command.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, RUST_LOG or default filter)             │
/// │  2. Parse arguments                                                     │
/// │  3. Load ConfigState (env), apply --db                                  │
/// │  4. Open database (default: platform data dir), run migrations          │
/// │  5. Dispatch, print envelope, close pool                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = ConfigState::from_env().with_db_path(cli.db.clone());

    let db = match DbState::open(&config).await {
        Ok(db) => db,
        Err(e) => {
            emit(&ApiResponse::<()>::err(e), cli.pretty);
            return ExitCode::FAILURE;
        }
    };
    info!("Database connected and migrations applied");

    let success = dispatch(&db, &config, cli.command, cli.pretty).await;
    db.inner().close().await;

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Runs `command` and prints its envelope. Returns the envelope's `success`.
pub async fn dispatch(db: &DbState, config: &ConfigState, command: Command, pretty: bool) -> bool {
    match command {
        Command::Client { action } => match action {
            ClientAction::List { search } => emit(&client::get_clients(db, search).await, pretty),
            ClientAction::Get { id } => emit(&client::get_client(db, id).await, pretty),
            ClientAction::Add { json } => match payload(&json) {
                Ok(input) => emit(&client::add_client(db, input).await, pretty),
                Err(e) => emit_error(e, pretty),
            },
            ClientAction::Update { id, json } => match payload(&json) {
                Ok(input) => emit(&client::update_client(db, id, input).await, pretty),
                Err(e) => emit_error(e, pretty),
            },
            ClientAction::Delete { id } => emit(&client::delete_client(db, id).await, pretty),
        },

        Command::Category { action } => match action {
            CategoryAction::List => emit(&category::get_categories(db).await, pretty),
            CategoryAction::Add { name } => emit(&category::add_category(db, name).await, pretty),
            CategoryAction::Update { id, name } => {
                emit(&category::update_category(db, id, name).await, pretty)
            }
            CategoryAction::Delete { id } => emit(&category::delete_category(db, id).await, pretty),
        },

        Command::Product { action } => match action {
            ProductAction::List { search } => {
                emit(&product::get_products(db, search).await, pretty)
            }
            ProductAction::Get { id } => emit(&product::get_product(db, id).await, pretty),
            ProductAction::Add { json } => match payload(&json) {
                Ok(input) => emit(&product::add_product(db, input).await, pretty),
                Err(e) => emit_error(e, pretty),
            },
            ProductAction::Update { id, json } => match payload(&json) {
                Ok(input) => emit(&product::update_product(db, id, input).await, pretty),
                Err(e) => emit_error(e, pretty),
            },
            ProductAction::Delete { id } => emit(&product::delete_product(db, id).await, pretty),
            ProductAction::LowStock => emit(&product::get_low_stock_products(db).await, pretty),
            ProductAction::Inventory => emit(&product::get_inventory(db).await, pretty),
        },

        Command::Sale { action } => match action {
            SaleAction::Create { json } => match payload(&json) {
                Ok(request) => emit(&sale::create_sale(db, request).await, pretty),
                Err(e) => emit_error(e, pretty),
            },
            SaleAction::List => emit(&sale::get_sales(db).await, pretty),
            SaleAction::Get { id } => emit(&sale::get_sale(db, id).await, pretty),
            SaleAction::Items { sale_id } => emit(&sale::get_sale_items(db, sale_id).await, pretty),
            SaleAction::Delete { id } => emit(&sale::delete_sale(db, id).await, pretty),
            SaleAction::DeleteItem { item_id } => {
                emit(&sale::delete_sale_item(db, item_id).await, pretty)
            }
        },

        Command::Credit { action } => match action {
            CreditAction::List { search } => emit(&credit::get_credits(db, search).await, pretty),
            CreditAction::Pay {
                sale_id,
                amount_cents,
            } => emit(
                &credit::add_credit_payment(db, sale_id, amount_cents).await,
                pretty,
            ),
            CreditAction::MarkPaid { sale_id } => {
                emit(&credit::mark_credit_as_paid(db, sale_id).await, pretty)
            }
        },

        Command::Quote { action } => match action {
            QuoteAction::Create { json } => match payload(&json) {
                Ok(request) => emit(&quote::create_quote(db, request).await, pretty),
                Err(e) => emit_error(e, pretty),
            },
            QuoteAction::List => emit(&quote::get_quotes(db).await, pretty),
            QuoteAction::Get { id } => emit(&quote::get_quote(db, id).await, pretty),
            QuoteAction::Items { quote_id } => {
                emit(&quote::get_quote_items(db, quote_id).await, pretty)
            }
            QuoteAction::Approve { id } => emit(&quote::approve_quote(db, id).await, pretty),
            QuoteAction::Delete { id } => emit(&quote::delete_quote(db, id).await, pretty),
        },

        Command::Report {
            start,
            end,
            granularity,
        } => {
            let granularity = granularity.unwrap_or(config.report_granularity);
            emit(
                &report::sales_report(db, &start, &end, granularity).await,
                pretty,
            )
        }

        Command::Settings { action } => match action {
            SettingsAction::Get => emit(&settings::get_company_settings(db).await, pretty),
            SettingsAction::Set { json } => match payload(&json) {
                Ok(input) => emit(&settings::update_company_settings(db, input).await, pretty),
                Err(e) => emit_error(e, pretty),
            },
        },

        Command::Dashboard => emit(&system::get_dashboard_data(db).await, pretty),
        Command::Numbers => emit(&system::get_last_numbers(db).await, pretty),
        Command::Config => emit(&system::get_config(config), pretty),

        Command::Reset { yes } => {
            if yes {
                emit(&system::reset_database(db).await, pretty)
            } else {
                emit_error(
                    ApiError::validation("Reset deletes all data; pass --yes to confirm"),
                    pretty,
                )
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Parses a `--json` payload.
fn payload<T: DeserializeOwned>(json: &str) -> Result<T, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::validation(format!("Invalid JSON payload: {}", e)))
}

/// Prints the envelope on stdout and returns its `success`.
fn emit<T: Serialize>(response: &ApiResponse<T>, pretty: bool) -> bool {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };

    match rendered {
        Ok(text) => {
            println!("{}", text);
            response.success
        }
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            false
        }
    }
}

fn emit_error(error: ApiError, pretty: bool) -> bool {
    emit(&ApiResponse::<()>::err(error), pretty)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tendero_db=trace` - Show trace for the store only
/// - Default: INFO, DEBUG for tendero crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tendero=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tendero_db::{Database, DbConfig};

    async fn db() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["tendero"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_parse_report() {
        let command = parse(&["report", "--start", "2024-01-01", "--end", "2024-01-31", "--granularity", "week"]);
        match command {
            Command::Report { granularity, .. } => {
                assert_eq!(granularity, Some(ReportGranularity::Weekly))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_granularity() {
        let result = Cli::try_parse_from([
            "tendero", "report", "--start", "2024-01-01", "--end", "2024-01-02", "--granularity", "hourly",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_sale_flow() {
        let db = db().await;
        let config = ConfigState::default();

        let add = parse(&[
            "product",
            "add",
            "--json",
            r#"{"code":"A1","name":"Arroz","sale_price_cents":100,"stock":10}"#,
        ]);
        assert!(dispatch(&db, &config, add, false).await);

        let sale = parse(&[
            "sale",
            "create",
            "--json",
            r#"{"items":[{"product_id":1,"quantity":3}],"sale_type":"credit","paid_cents":100}"#,
        ]);
        assert!(dispatch(&db, &config, sale, false).await);

        assert!(dispatch(&db, &config, parse(&["credit", "pay", "1", "200"]), false).await);
        assert!(!dispatch(&db, &config, parse(&["credit", "pay", "1", "1"]), false).await);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_bad_payload_and_unconfirmed_reset() {
        let db = db().await;
        let config = ConfigState::default();

        let bad = parse(&["client", "add", "--json", "{not json"]);
        assert!(!dispatch(&db, &config, bad, false).await);

        assert!(!dispatch(&db, &config, parse(&["reset"]), false).await);
        assert!(dispatch(&db, &config, parse(&["reset", "--yes"]), false).await);
    }
}

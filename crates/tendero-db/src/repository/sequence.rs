//! # Document Sequence Counters
//!
//! Issues invoice (`FACT-NNN`) and quote (`COT-NNN`) numbers.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale / create_quote transaction                                 │
//! │                                                                         │
//! │  1. SELECT last_value FROM document_sequences WHERE prefix = 'FACT'     │
//! │       │                                                                 │
//! │       ├── row exists  → n = last_value                                  │
//! │       └── no row      → n = trailing digits of the last numbered sale   │
//! │                          (keeps numbering of pre-existing data)         │
//! │  2. UPSERT last_value = n + 1                                           │
//! │  3. INSERT sale with invoice_number = FACT-{n+1:03}                     │
//! │  4. COMMIT  (or drop → counter and sale both roll back)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers open the transaction with `BEGIN IMMEDIATE`, so the write lock is
//! held from step 1 and concurrent writers see each other's counters.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tendero_core::sequence::{format_document_number, parse_document_number};
use tendero_core::{INVOICE_PREFIX, QUOTE_PREFIX};

/// The numbered document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Quote,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => INVOICE_PREFIX,
            DocumentKind::Quote => QUOTE_PREFIX,
        }
    }

    /// Query returning the number of the newest numbered row.
    fn last_issued_sql(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => {
                "SELECT invoice_number FROM sales \
                 WHERE invoice_number IS NOT NULL ORDER BY id DESC LIMIT 1"
            }
            DocumentKind::Quote => {
                "SELECT quote_number FROM quotes \
                 WHERE quote_number IS NOT NULL ORDER BY id DESC LIMIT 1"
            }
        }
    }
}

/// Allocates the next number for `kind` on the caller's transaction.
pub(crate) async fn next_number(conn: &mut SqliteConnection, kind: DocumentKind) -> DbResult<String> {
    let prefix = kind.prefix();

    let current: Option<i64> =
        sqlx::query_scalar("SELECT last_value FROM document_sequences WHERE prefix = ?1")
            .bind(prefix)
            .fetch_optional(&mut *conn)
            .await?;

    let last = match current {
        Some(value) => value,
        None => {
            let issued = last_issued(&mut *conn, kind).await?;
            let seeded = issued.as_deref().map(parse_document_number).unwrap_or(0);
            debug!(prefix = %prefix, seeded = seeded, "Seeding document counter");
            i64::try_from(seeded).unwrap_or(0)
        }
    };

    let next = last + 1;

    sqlx::query(
        r#"
        INSERT INTO document_sequences (prefix, last_value) VALUES (?1, ?2)
        ON CONFLICT(prefix) DO UPDATE SET last_value = excluded.last_value
        "#,
    )
    .bind(prefix)
    .bind(next)
    .execute(&mut *conn)
    .await?;

    let number = format_document_number(prefix, next as u64);
    debug!(number = %number, "Allocated document number");
    Ok(number)
}

async fn last_issued<'e, E>(executor: E, kind: DocumentKind) -> DbResult<Option<String>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let number: Option<Option<String>> = sqlx::query_scalar(kind.last_issued_sql())
        .fetch_optional(executor)
        .await?;

    Ok(number.flatten())
}

/// Read-only access to issued numbers.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    pool: SqlitePool,
}

impl SequenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SequenceRepository { pool }
    }

    /// Number of the most recent sale, if any was numbered.
    pub async fn last_invoice_number(&self) -> DbResult<Option<String>> {
        last_issued(&self.pool, DocumentKind::Invoice).await
    }

    /// Number of the most recent quote, if any was numbered.
    pub async fn last_quote_number(&self) -> DbResult<Option<String>> {
        last_issued(&self.pool, DocumentKind::Quote).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_counter_starts_at_one_and_increments() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        assert_eq!(next_number(&mut conn, DocumentKind::Invoice).await.unwrap(), "FACT-001");
        assert_eq!(next_number(&mut conn, DocumentKind::Invoice).await.unwrap(), "FACT-002");
        assert_eq!(next_number(&mut conn, DocumentKind::Quote).await.unwrap(), "COT-001");
    }

    #[tokio::test]
    async fn test_counter_seeded_from_existing_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query(
            "INSERT INTO sales (sale_date, invoice_number) VALUES ('2024-01-01 10:00:00', 'FACT-041')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(next_number(&mut conn, DocumentKind::Invoice).await.unwrap(), "FACT-042");
        drop(conn);

        assert_eq!(
            db.sequences().last_invoice_number().await.unwrap().as_deref(),
            Some("FACT-041")
        );
    }

    #[tokio::test]
    async fn test_unparseable_last_number_restarts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query("INSERT INTO quotes (quote_date, quote_number) VALUES ('2024-01-01 10:00:00', 'legacy')")
            .execute(db.pool())
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(next_number(&mut conn, DocumentKind::Quote).await.unwrap(), "COT-001");
    }
}

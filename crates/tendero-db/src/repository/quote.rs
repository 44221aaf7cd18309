//! # Quote Repository
//!
//! Quotes mirror sales but never touch stock. Approving a quote turns it
//! into a cash sale.
//!
//! ## Approval
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  approve(quote_id)            ONE transaction                           │
//! │                                                                         │
//! │  quote pending? ──no──► QuoteAlreadyApproved                            │
//! │       │ yes                                                             │
//! │  has lines?     ──no──► EmptyInput                                      │
//! │       │ yes                                                             │
//! │  every line still has a product? ──no──► ProductUnavailable             │
//! │       │ yes                                                             │
//! │  insert_sale(cash, quoted prices)   ← same path as create_sale          │
//! │       │                               (stock check, FACT-NNN)           │
//! │  quote.status = approved, quote.sale_id = new sale                      │
//! │       │                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::client::ClientRepository;
use super::{begin_write, local_now};
use super::product::fetch_product;
use super::sale::insert_sale;
use super::sequence::{next_number, DocumentKind};
use crate::error::{DbError, DbResult};
use tendero_core::money::{document_total, line_total};
use tendero_core::validation::{validate_line_count, validate_price_cents, validate_quantity};
use tendero_core::{
    CoreError, CreateQuoteRequest, CreateSaleRequest, Money, PaymentTerms, Quote, QuoteItem,
    QuoteStatus, QuoteWithItems, SaleLineRequest, DELETED_PRODUCT_LABEL,
};

const QUOTE_SELECT: &str = r#"
    SELECT
        q.id,
        q.client_id,
        c.name AS client_name,
        q.quote_date,
        q.total_cents,
        q.quote_number,
        q.status,
        q.sale_id
    FROM quotes q
    LEFT JOIN clients c ON c.id = q.client_id
"#;

const QUOTE_ITEM_SELECT: &str = r#"
    SELECT
        qi.id,
        qi.quote_id,
        qi.product_id,
        qi.product_name,
        qi.product_code,
        qi.quantity,
        qi.price_cents,
        qi.subtotal_cents
    FROM quote_items qi
"#;

#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Quote>> {
        fetch_quote(&self.pool, id).await
    }

    pub async fn get_with_items(&self, id: i64) -> DbResult<Option<QuoteWithItems>> {
        let Some(quote) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.items(id).await?;

        Ok(Some(QuoteWithItems { quote, items }))
    }

    pub async fn items(&self, quote_id: i64) -> DbResult<Vec<QuoteItem>> {
        fetch_items(&self.pool, quote_id).await
    }

    /// All quotes with their lines, newest first.
    pub async fn list(&self) -> DbResult<Vec<QuoteWithItems>> {
        let sql = format!("{QUOTE_SELECT} ORDER BY q.quote_date DESC, q.id DESC");
        let quotes = sqlx::query_as::<_, Quote>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!("{QUOTE_ITEM_SELECT} ORDER BY qi.quote_id, qi.id");
        let items = sqlx::query_as::<_, QuoteItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut by_quote: HashMap<i64, Vec<QuoteItem>> = HashMap::new();
        for item in items {
            by_quote.entry(item.quote_id).or_default().push(item);
        }

        Ok(quotes
            .into_iter()
            .map(|quote| {
                let items = by_quote.remove(&quote.id).unwrap_or_default();
                QuoteWithItems { quote, items }
            })
            .collect())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a quote and returns its id. Stock is not checked or changed.
    ///
    /// A line whose product doesn't exist keeps the caller's name, code and
    /// price, falling back to "Producto eliminado", an empty code and 0.
    pub async fn create(&self, request: &CreateQuoteRequest) -> DbResult<i64> {
        if request.items.is_empty() {
            return Err(CoreError::empty("Quote").into());
        }
        validate_line_count(request.items.len())?;

        let mut tx = begin_write(&self.pool).await?;

        if let Some(client_id) = request.client_id {
            if !ClientRepository::exists(&mut *tx, client_id).await? {
                return Err(CoreError::ClientNotFound(client_id).into());
            }
        }

        let mut lines = Vec::with_capacity(request.items.len());

        for line in &request.items {
            validate_quantity(line.quantity)?;

            let product = match line.product_id {
                Some(id) => fetch_product(&mut *tx, id).await?,
                None => None,
            };

            let (product_id, name, code, price_cents) = match product {
                Some(p) => (
                    Some(p.id),
                    p.name,
                    p.code,
                    line.price_cents.unwrap_or(p.sale_price_cents),
                ),
                None => (
                    None,
                    line.product_name
                        .clone()
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| DELETED_PRODUCT_LABEL.to_string()),
                    line.product_code.clone().unwrap_or_default(),
                    line.price_cents.unwrap_or(0),
                ),
            };

            validate_price_cents("price", price_cents)?;
            let price = Money::from_cents(price_cents);
            let subtotal = line_total(price, line.quantity)?;

            lines.push((product_id, name, code, line.quantity, price, subtotal));
        }

        let total = document_total(lines.iter().map(|(.., subtotal)| *subtotal))?;

        let quote_number = next_number(&mut tx, DocumentKind::Quote).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO quotes (client_id, quote_date, total_cents, quote_number, status)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(request.client_id)
        .bind(local_now())
        .bind(total.cents())
        .bind(&quote_number)
        .bind(QuoteStatus::Pending)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_value(&quote_number))?;

        let quote_id = result.last_insert_rowid();

        for (product_id, name, code, quantity, price, subtotal) in &lines {
            sqlx::query(
                r#"
                INSERT INTO quote_items (
                    quote_id, product_id, product_name, product_code,
                    quantity, price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(quote_id)
            .bind(product_id)
            .bind(name)
            .bind(code)
            .bind(quantity)
            .bind(price.cents())
            .bind(subtotal.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            quote_id = quote_id,
            quote_number = %quote_number,
            total = %total,
            lines = lines.len(),
            "Quote created"
        );
        Ok(quote_id)
    }

    /// Converts a pending quote into a cash sale. Returns the sale id.
    ///
    /// ## Errors
    /// - `QuoteNotFound`
    /// - `QuoteAlreadyApproved` - a quote is approved once
    /// - `EmptyInput` - the quote has no lines
    /// - `ProductUnavailable` - a quoted product was deleted
    /// - `InsufficientStock` - nothing is written
    pub async fn approve(&self, quote_id: i64) -> DbResult<i64> {
        debug!(quote_id = quote_id, "Approving quote");

        let mut tx = begin_write(&self.pool).await?;

        let quote = fetch_quote(&mut *tx, quote_id)
            .await?
            .ok_or(CoreError::QuoteNotFound(quote_id))?;

        if quote.status == QuoteStatus::Approved {
            return Err(CoreError::QuoteAlreadyApproved {
                quote_id,
                sale_id: quote.sale_id,
            }
            .into());
        }

        let items = fetch_items(&mut *tx, quote_id).await?;
        if items.is_empty() {
            return Err(CoreError::empty("Quote").into());
        }

        let lines = items
            .iter()
            .map(|item| match item.product_id {
                Some(product_id) => Ok(SaleLineRequest {
                    product_id,
                    quantity: item.quantity,
                    price_cents: Some(item.price_cents),
                }),
                None => Err(CoreError::ProductUnavailable {
                    name: item.product_name.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateSaleRequest {
            client_id: quote.client_id,
            items: lines,
            sale_type: PaymentTerms::Cash,
            paid_cents: None,
            outstanding_cents: None,
        };

        let sale_id = insert_sale(&mut tx, &request).await?;

        let result = sqlx::query(
            "UPDATE quotes SET status = ?2, sale_id = ?3 WHERE id = ?1 AND status = ?4",
        )
        .bind(quote_id)
        .bind(QuoteStatus::Approved)
        .bind(sale_id)
        .bind(QuoteStatus::Pending)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::TransactionFailed(format!(
                "quote {} changed during approval",
                quote_id
            )));
        }

        tx.commit().await?;

        info!(quote_id = quote_id, sale_id = sale_id, "Quote approved");
        Ok(sale_id)
    }

    /// Deletes a quote and its lines. Stock is untouched.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        sqlx::query("DELETE FROM quote_items WHERE quote_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM quotes WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::QuoteNotFound(id).into());
        }

        tx.commit().await?;

        info!(quote_id = id, "Quote deleted");
        Ok(())
    }
}

async fn fetch_quote<'e, E>(executor: E, id: i64) -> DbResult<Option<Quote>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let sql = format!("{QUOTE_SELECT} WHERE q.id = ?1");

    let quote = sqlx::query_as::<_, Quote>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(quote)
}

async fn fetch_items<'e, E>(executor: E, quote_id: i64) -> DbResult<Vec<QuoteItem>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let sql = format!("{QUOTE_ITEM_SELECT} WHERE qi.quote_id = ?1 ORDER BY qi.id");

    let items = sqlx::query_as::<_, QuoteItem>(&sql)
        .bind(quote_id)
        .fetch_all(executor)
        .await?;

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tendero_core::error::ErrorKind;
    use tendero_core::{ProductInput, QuoteLineRequest};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&ProductInput {
                code: "A1".to_string(),
                name: "Arroz".to_string(),
                sale_price_cents: 100,
                stock: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        (db, product.id)
    }

    fn line(product_id: Option<i64>, quantity: i64) -> QuoteLineRequest {
        QuoteLineRequest {
            product_id,
            quantity,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_does_not_touch_stock() {
        let (db, product_id) = setup().await;

        let quote_id = db
            .quotes()
            .create(&CreateQuoteRequest {
                client_id: None,
                items: vec![line(Some(product_id), 4)],
            })
            .await
            .unwrap();

        let quote = db.quotes().get_with_items(quote_id).await.unwrap().unwrap();
        assert_eq!(quote.quote.quote_number.as_deref(), Some("COT-001"));
        assert_eq!(quote.quote.status, QuoteStatus::Pending);
        assert_eq!(quote.quote.total_cents, 400);
        assert_eq!(quote.items[0].product_name, "Arroz");

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn test_missing_product_fallbacks() {
        let (db, _) = setup().await;

        let quote_id = db
            .quotes()
            .create(&CreateQuoteRequest {
                client_id: None,
                items: vec![
                    line(Some(999), 1),
                    QuoteLineRequest {
                        product_id: None,
                        quantity: 2,
                        price_cents: Some(50),
                        product_name: Some("Servicio".to_string()),
                        product_code: Some("SRV".to_string()),
                    },
                ],
            })
            .await
            .unwrap();

        let items = db.quotes().items(quote_id).await.unwrap();
        assert_eq!(items[0].product_name, DELETED_PRODUCT_LABEL);
        assert_eq!(items[0].product_code, "");
        assert_eq!(items[0].price_cents, 0);
        assert_eq!(items[0].product_id, None);
        assert_eq!(items[1].product_name, "Servicio");
        assert_eq!(items[1].subtotal_cents, 100);
    }

    #[tokio::test]
    async fn test_approve_once() {
        let (db, product_id) = setup().await;

        let quote_id = db
            .quotes()
            .create(&CreateQuoteRequest {
                client_id: None,
                items: vec![line(Some(product_id), 4)],
            })
            .await
            .unwrap();

        let sale_id = db.quotes().approve(quote_id).await.unwrap();

        let quote = db.quotes().get_by_id(quote_id).await.unwrap().unwrap();
        assert_eq!(quote.status, QuoteStatus::Approved);
        assert_eq!(quote.sale_id, Some(sale_id));

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 6);

        let err = db.quotes().approve(quote_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_approve_with_deleted_product_rolls_back() {
        let (db, product_id) = setup().await;

        let quote_id = db
            .quotes()
            .create(&CreateQuoteRequest {
                client_id: None,
                items: vec![line(Some(product_id), 1)],
            })
            .await
            .unwrap();
        db.products().delete(product_id).await.unwrap();

        let err = db.quotes().approve(quote_id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ProductUnavailable { .. })
        ));

        let quote = db.quotes().get_by_id(quote_id).await.unwrap().unwrap();
        assert_eq!(quote.status, QuoteStatus::Pending);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, product_id) = setup().await;

        let quote_id = db
            .quotes()
            .create(&CreateQuoteRequest {
                client_id: None,
                items: vec![line(Some(product_id), 1)],
            })
            .await
            .unwrap();

        db.quotes().delete(quote_id).await.unwrap();
        assert!(db.quotes().get_by_id(quote_id).await.unwrap().is_none());
        assert!(db.quotes().items(quote_id).await.unwrap().is_empty());
        assert_eq!(
            db.quotes().delete(quote_id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert!(db
            .quotes()
            .create(&CreateQuoteRequest::default())
            .await
            .is_err());
    }
}

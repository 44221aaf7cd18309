//! # Sale Repository
//!
//! The sales half of the transaction engine: sale creation, deletion with
//! stock restoration, line deletion, and credit bookkeeping.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (one transaction)                                            │
//! │     ├── resolve lines: product exists, stock >= quantity                │
//! │     ├── snapshot name / code / price                                    │
//! │     ├── total = Σ price × quantity                                      │
//! │     ├── settle: cash → paid = total, credit → paid + outstanding        │
//! │     ├── allocate FACT-NNN                                               │
//! │     └── insert sale + lines, decrement stock per line                   │
//! │                                                                         │
//! │  2. (CREDIT) PAYMENTS                                                   │
//! │     └── add_payment() → outstanding shrinks, at 0 the type is `paid`    │
//! │                                                                         │
//! │  3. (OPTIONAL) DELETE LINE                                              │
//! │     └── restore stock, recompute total, re-settle                       │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                   │
//! │     └── restore stock for every line, remove sale                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::client::ClientRepository;
use super::{begin_write, local_now};
use super::product::{adjust_stock, fetch_product};
use super::sequence::{next_number, DocumentKind};
use crate::error::{DbError, DbResult};
use tendero_core::credit::{self, settle_new_sale, Settlement};
use tendero_core::money::{document_total, line_total};
use tendero_core::validation::{
    validate_line_count, validate_price_cents, validate_quantity, validate_search_term,
};
use tendero_core::{
    CoreError, CreateSaleRequest, CreditSummary, Money, Sale, SaleItem, SaleWithItems,
};

const SALE_SELECT: &str = r#"
    SELECT
        s.id,
        s.client_id,
        c.name AS client_name,
        s.sale_date,
        s.total_cents,
        s.invoice_number,
        s.sale_type,
        s.paid_cents,
        s.outstanding_cents
    FROM sales s
    LEFT JOIN clients c ON c.id = s.client_id
"#;

const SALE_ITEM_SELECT: &str = r#"
    SELECT
        si.id,
        si.sale_id,
        si.product_id,
        si.product_name,
        si.product_code,
        si.quantity,
        si.price_cents,
        si.subtotal_cents
    FROM sale_items si
"#;

/// A requested line after its product was looked up.
#[derive(Debug)]
struct ResolvedLine {
    product_id: i64,
    name: String,
    code: String,
    quantity: i64,
    price: Money,
    subtotal: Money,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        fetch_sale(&self.pool, id).await
    }

    /// Gets a sale together with its lines.
    pub async fn get_with_items(&self, id: i64) -> DbResult<Option<SaleWithItems>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.items(id).await?;

        Ok(Some(SaleWithItems { sale, items }))
    }

    /// Lines of a sale in insertion order.
    pub async fn items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let sql = format!("{SALE_ITEM_SELECT} WHERE si.sale_id = ?1 ORDER BY si.id");

        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// All sales with their lines, newest first.
    pub async fn list(&self) -> DbResult<Vec<SaleWithItems>> {
        let sql = format!("{SALE_SELECT} ORDER BY s.sale_date DESC, s.id DESC");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!("{SALE_ITEM_SELECT} ORDER BY si.sale_id, si.id");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(attach_items(sales, items))
    }

    /// Sales dated within `from..=to`, oldest first, with their lines.
    pub async fn in_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DbResult<Vec<SaleWithItems>> {
        debug!(from = %from, to = %to, "Loading sales in range");

        let sql = format!("{SALE_SELECT} WHERE s.sale_date BETWEEN ?1 AND ?2 ORDER BY s.sale_date, s.id");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            "{SALE_ITEM_SELECT} JOIN sales s ON s.id = si.sale_id \
             WHERE s.sale_date BETWEEN ?1 AND ?2 ORDER BY si.sale_id, si.id"
        );
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(attach_items(sales, items))
    }

    // =========================================================================
    // Creation & Deletion
    // =========================================================================

    /// Creates a sale atomically and returns its id.
    ///
    /// ## Errors
    /// - `EmptyInput` - no lines
    /// - `ProductNotFound` / `ClientNotFound`
    /// - `InsufficientStock` - nothing is written
    /// - `InvalidAmount` - credit split doesn't add up
    pub async fn create(&self, request: &CreateSaleRequest) -> DbResult<i64> {
        let mut tx = begin_write(&self.pool).await?;
        let sale_id = insert_sale(&mut tx, request).await?;
        tx.commit().await?;

        Ok(sale_id)
    }

    /// Deletes a sale and puts every sold unit back on the shelf.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        if fetch_sale(&mut *tx, id).await?.is_none() {
            return Err(CoreError::SaleNotFound(id).into());
        }

        let lines: Vec<(Option<i64>, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM sale_items WHERE sale_id = ?1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        for (product_id, quantity) in &lines {
            if let Some(product_id) = product_id {
                adjust_stock(&mut tx, *product_id, *quantity).await?;
            }
        }

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(sale_id = id, lines = lines.len(), "Sale deleted, stock restored");
        Ok(())
    }

    /// Deletes one line of a sale.
    ///
    /// Restores the line's stock, recomputes the sale total from the
    /// remaining lines and re-settles the balance. Returns the updated sale.
    pub async fn delete_item(&self, item_id: i64) -> DbResult<Sale> {
        let mut tx = begin_write(&self.pool).await?;

        let line: Option<(i64, Option<i64>, i64)> =
            sqlx::query_as("SELECT sale_id, product_id, quantity FROM sale_items WHERE id = ?1")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (sale_id, product_id, quantity) = line.ok_or(CoreError::SaleItemNotFound(item_id))?;

        if let Some(product_id) = product_id {
            adjust_stock(&mut tx, product_id, quantity).await?;
        }

        sqlx::query("DELETE FROM sale_items WHERE id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(subtotal_cents), 0) FROM sale_items WHERE sale_id = ?1",
        )
        .bind(sale_id)
        .fetch_one(&mut *tx)
        .await?;

        let sale = fetch_sale(&mut *tx, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        let total = Money::from_cents(total);
        let settlement = credit::resettle(Settlement::from(&sale), total);
        write_settlement(&mut tx, sale_id, total, settlement).await?;

        let sale = fetch_sale(&mut *tx, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        tx.commit().await?;

        info!(
            sale_id = sale_id,
            item_id = item_id,
            total = %total,
            "Sale line deleted"
        );
        Ok(sale)
    }

    // =========================================================================
    // Credits
    // =========================================================================

    /// Credit sales with an open balance, newest first.
    ///
    /// ## Arguments
    /// * `search` - Case-insensitive substring of the client name
    pub async fn credits(&self, search: Option<&str>) -> DbResult<Vec<CreditSummary>> {
        let search = validate_search_term(search)?.map(|s| s.to_lowercase());

        let credits = sqlx::query_as::<_, CreditSummary>(
            r#"
            SELECT
                s.id AS sale_id,
                s.invoice_number,
                s.client_id,
                c.name AS client_name,
                s.sale_date,
                s.total_cents,
                s.paid_cents,
                s.outstanding_cents
            FROM sales s
            LEFT JOIN clients c ON c.id = s.client_id
            WHERE s.sale_type = 'credit' AND s.outstanding_cents > 0
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // SQLite's LIKE only folds ASCII; client names are not.
        let credits = match search {
            None => credits,
            Some(term) => credits
                .into_iter()
                .filter(|c| {
                    c.client_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&term))
                })
                .collect(),
        };

        Ok(credits)
    }

    /// Applies a payment to a credit sale. Returns the updated sale.
    ///
    /// ## Errors
    /// - `SaleNotFound`
    /// - `InvalidAmount` - amount ≤ 0 or larger than the outstanding balance
    pub async fn add_payment(&self, sale_id: i64, amount_cents: i64) -> DbResult<Sale> {
        let amount = Money::from_cents(amount_cents);
        debug!(sale_id = sale_id, amount = %amount, "Recording credit payment");

        let mut tx = begin_write(&self.pool).await?;

        let sale = fetch_sale(&mut *tx, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        let current = Settlement::from(&sale);
        let next = credit::apply_payment(current, amount)?;

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                paid_cents = ?2,
                outstanding_cents = ?3,
                sale_type = ?4
            WHERE id = ?1 AND outstanding_cents = ?5
            "#,
        )
        .bind(sale_id)
        .bind(next.paid.cents())
        .bind(next.outstanding.cents())
        .bind(next.sale_type)
        .bind(current.outstanding.cents())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            warn!(sale_id = sale_id, "Balance changed while applying payment");
            return Err(DbError::TransactionFailed(format!(
                "balance of sale {} changed during payment",
                sale_id
            )));
        }

        let sale = fetch_sale(&mut *tx, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        tx.commit().await?;

        info!(
            sale_id = sale_id,
            amount = %amount,
            outstanding = %next.outstanding,
            sale_type = %next.sale_type.as_str(),
            "Credit payment applied"
        );
        Ok(sale)
    }

    /// Settles the whole balance of a sale and marks it `paid`, cash sales
    /// included. Returns the updated sale.
    pub async fn mark_paid(&self, sale_id: i64) -> DbResult<Sale> {
        let mut tx = begin_write(&self.pool).await?;

        let sale = fetch_sale(&mut *tx, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        let settlement = credit::mark_paid(sale.total());
        write_settlement(&mut tx, sale_id, sale.total(), settlement).await?;

        let sale = fetch_sale(&mut *tx, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        tx.commit().await?;

        info!(sale_id = sale_id, "Credit marked as paid");
        Ok(sale)
    }
}

// =============================================================================
// Transaction-scoped helpers
// =============================================================================

/// Reads one sale on any executor (pool or open transaction).
pub(crate) async fn fetch_sale<'e, E>(executor: E, id: i64) -> DbResult<Option<Sale>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let sql = format!("{SALE_SELECT} WHERE s.id = ?1");

    let sale = sqlx::query_as::<_, Sale>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(sale)
}

/// Creates a sale on the caller's transaction and returns its id.
///
/// Shared by `SaleRepository::create` and quote approval so both go
/// through the same stock checks, snapshots and numbering.
pub(crate) async fn insert_sale(
    conn: &mut SqliteConnection,
    request: &CreateSaleRequest,
) -> DbResult<i64> {
    if request.items.is_empty() {
        return Err(CoreError::empty("Sale").into());
    }
    validate_line_count(request.items.len())?;

    if let Some(client_id) = request.client_id {
        if !ClientRepository::exists(&mut *conn, client_id).await? {
            return Err(CoreError::ClientNotFound(client_id).into());
        }
    }

    // Resolve every line before writing anything. Repeated products are
    // checked against their combined quantity.
    let mut demand: HashMap<i64, i64> = HashMap::new();
    let mut lines = Vec::with_capacity(request.items.len());

    for line in &request.items {
        validate_quantity(line.quantity)?;

        let product = fetch_product(&mut *conn, line.product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(line.product_id))?;

        let requested = {
            let entry = demand.entry(product.id).or_insert(0);
            *entry += line.quantity;
            *entry
        };

        if !product.can_sell(requested) {
            return Err(CoreError::InsufficientStock {
                code: product.code,
                available: product.stock,
                requested,
            }
            .into());
        }

        let price_cents = line.price_cents.unwrap_or(product.sale_price_cents);
        validate_price_cents("price", price_cents)?;
        let price = Money::from_cents(price_cents);

        lines.push(ResolvedLine {
            product_id: product.id,
            name: product.name,
            code: product.code,
            quantity: line.quantity,
            price,
            subtotal: line_total(price, line.quantity)?,
        });
    }

    let total = document_total(lines.iter().map(|l| l.subtotal))?;

    let settlement = settle_new_sale(
        request.sale_type,
        total,
        request.paid_cents.map(Money::from_cents),
        request.outstanding_cents.map(Money::from_cents),
    )?;

    let invoice_number = next_number(&mut *conn, DocumentKind::Invoice).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO sales (
            client_id, sale_date, total_cents, invoice_number,
            sale_type, paid_cents, outstanding_cents
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(request.client_id)
    .bind(local_now())
    .bind(total.cents())
    .bind(&invoice_number)
    .bind(settlement.sale_type)
    .bind(settlement.paid.cents())
    .bind(settlement.outstanding.cents())
    .execute(&mut *conn)
    .await
    .map_err(|e| DbError::from(e).with_value(&invoice_number))?;

    let sale_id = result.last_insert_rowid();

    for line in &lines {
        sqlx::query(
            r#"
            INSERT INTO sale_items (
                sale_id, product_id, product_name, product_code,
                quantity, price_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(sale_id)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(&line.code)
        .bind(line.quantity)
        .bind(line.price.cents())
        .bind(line.subtotal.cents())
        .execute(&mut *conn)
        .await?;

        if !adjust_stock(&mut *conn, line.product_id, -line.quantity).await? {
            return Err(CoreError::InsufficientStock {
                code: line.code.clone(),
                available: 0,
                requested: line.quantity,
            }
            .into());
        }
    }

    info!(
        sale_id = sale_id,
        invoice_number = %invoice_number,
        total = %total,
        sale_type = %settlement.sale_type.as_str(),
        lines = lines.len(),
        "Sale created"
    );
    Ok(sale_id)
}

async fn write_settlement(
    conn: &mut SqliteConnection,
    sale_id: i64,
    total: Money,
    settlement: Settlement,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE sales SET
            total_cents = ?2,
            sale_type = ?3,
            paid_cents = ?4,
            outstanding_cents = ?5
        WHERE id = ?1
        "#,
    )
    .bind(sale_id)
    .bind(total.cents())
    .bind(settlement.sale_type)
    .bind(settlement.paid.cents())
    .bind(settlement.outstanding.cents())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Pairs each sale with its lines, preserving the order of `sales`.
fn attach_items(sales: Vec<Sale>, items: Vec<SaleItem>) -> Vec<SaleWithItems> {
    let mut by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::new();
    for item in items {
        by_sale.entry(item.sale_id).or_default().push(item);
    }

    sales
        .into_iter()
        .map(|sale| {
            let items = by_sale.remove(&sale.id).unwrap_or_default();
            SaleWithItems { sale, items }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tendero_core::error::ErrorKind;
    use tendero_core::{PaymentTerms, ProductInput, SaleLineRequest, SaleType};

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

    fn cash(product_id: i64, quantity: i64) -> CreateSaleRequest {
        CreateSaleRequest {
            items: vec![SaleLineRequest {
                product_id,
                quantity,
                price_cents: None,
            }],
            ..Default::default()
        }
    }

    async fn stock(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_create_snapshots_and_decrements() {
        let (db, product_id) = setup().await;

        let sale_id = db.sales().create(&cash(product_id, 3)).await.unwrap();
        let sale = db.sales().get_with_items(sale_id).await.unwrap().unwrap();

        assert_eq!(sale.sale.total_cents, 300);
        assert_eq!(sale.sale.paid_cents, 300);
        assert_eq!(sale.sale.sale_type, SaleType::Cash);
        assert_eq!(sale.sale.invoice_number.as_deref(), Some("FACT-001"));
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].product_code, "A1");
        assert_eq!(stock(&db, product_id).await, 7);
    }

    #[tokio::test]
    async fn test_price_override() {
        let (db, product_id) = setup().await;

        let mut request = cash(product_id, 2);
        request.items[0].price_cents = Some(80);
        let sale_id = db.sales().create(&request).await.unwrap();

        let sale = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 160);
    }

    #[tokio::test]
    async fn test_repeated_product_checked_combined() {
        let (db, product_id) = setup().await;

        let mut request = cash(product_id, 6);
        request.items.push(SaleLineRequest {
            product_id,
            quantity: 5,
            price_cents: None,
        });

        let err = db.sales().create(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(stock(&db, product_id).await, 10);
    }

    #[tokio::test]
    async fn test_empty_and_unknown() {
        let (db, _) = setup().await;

        let err = db.sales().create(&CreateSaleRequest::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);

        let err = db.sales().create(&cash(999, 1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let mut request = cash(1, 1);
        request.client_id = Some(42);
        let err = db.sales().create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ClientNotFound(42))));

        assert_eq!(db.sales().delete(7).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(db.sales().delete_item(7).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_credit_sale_and_payments() {
        let (db, product_id) = setup().await;

        let mut request = cash(product_id, 3);
        request.sale_type = PaymentTerms::Credit;
        request.paid_cents = Some(100);
        let sale_id = db.sales().create(&request).await.unwrap();

        let credits = db.sales().credits(None).await.unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].outstanding_cents, 200);

        let sale = db.sales().add_payment(sale_id, 50).await.unwrap();
        assert_eq!(sale.sale_type, SaleType::Credit);
        assert_eq!(sale.paid_cents + sale.outstanding_cents, sale.total_cents);

        let err = db.sales().add_payment(sale_id, 151).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);

        let sale = db.sales().mark_paid(sale_id).await.unwrap();
        assert_eq!(sale.sale_type, SaleType::Paid);
        assert_eq!(sale.outstanding_cents, 0);
        assert!(db.sales().credits(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_paid_on_cash_sale() {
        let (db, product_id) = setup().await;
        let sale_id = db.sales().create(&cash(product_id, 2)).await.unwrap();

        let sale = db.sales().mark_paid(sale_id).await.unwrap();
        assert_eq!(sale.sale_type, SaleType::Paid);
        assert_eq!(sale.paid_cents, sale.total_cents);
        assert_eq!(sale.outstanding_cents, 0);
    }

    #[tokio::test]
    async fn test_delete_item_resettles_credit() {
        let (db, product_id) = setup().await;

        let mut request = cash(product_id, 2);
        request.items.push(SaleLineRequest {
            product_id,
            quantity: 3,
            price_cents: None,
        });
        request.sale_type = PaymentTerms::Credit;
        request.paid_cents = Some(250);
        let sale_id = db.sales().create(&request).await.unwrap();

        let items = db.sales().items(sale_id).await.unwrap();
        let sale = db.sales().delete_item(items[1].id).await.unwrap();

        // Paid 250 towards what is now a 200 sale.
        assert_eq!(sale.total_cents, 200);
        assert_eq!(sale.paid_cents, 200);
        assert_eq!(sale.outstanding_cents, 0);
        assert_eq!(sale.sale_type, SaleType::Paid);
        assert_eq!(stock(&db, product_id).await, 8);
    }

    #[tokio::test]
    async fn test_in_range_bounds() {
        let (db, _) = setup().await;

        sqlx::query(
            r#"
            INSERT INTO sales (sale_date, total_cents, invoice_number, paid_cents)
            VALUES ('2024-03-01 00:00:00', 100, 'FACT-900', 100),
                   ('2024-03-01 23:59:59', 200, 'FACT-901', 200),
                   ('2024-03-02 00:00:00', 400, 'FACT-902', 400)
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let from = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let to = from.date().and_hms_opt(23, 59, 59).unwrap();

        let sales = db.sales().in_range(from, to).await.unwrap();
        let totals: Vec<i64> = sales.iter().map(|s| s.sale.total_cents).collect();
        assert_eq!(totals, [100, 200]);
    }

    #[tokio::test]
    async fn test_numbering_and_delete_restores_stock() {
        let (db, product_id) = setup().await;

        let first = db.sales().create(&cash(product_id, 3)).await.unwrap();
        let second = db.sales().create(&cash(product_id, 3)).await.unwrap();

        let second = db.sales().get_by_id(second).await.unwrap().unwrap();
        assert_eq!(second.invoice_number.as_deref(), Some("FACT-002"));
        assert_eq!(stock(&db, product_id).await, 4);

        db.sales().delete(first).await.unwrap();
        assert_eq!(stock(&db, product_id).await, 7);
        assert!(db.sales().get_by_id(first).await.unwrap().is_none());

        // Numbers are never reused after a delete.
        let third = db.sales().create(&cash(product_id, 1)).await.unwrap();
        let third = db.sales().get_by_id(third).await.unwrap().unwrap();
        assert_eq!(third.invoice_number.as_deref(), Some("FACT-003"));
    }

    #[tokio::test]
    async fn test_full_payment_closes_credit() {
        let (db, product_id) = setup().await;

        let mut request = cash(product_id, 3);
        request.sale_type = PaymentTerms::Credit;
        request.paid_cents = Some(100);
        request.outstanding_cents = Some(200);
        let sale_id = db.sales().create(&request).await.unwrap();

        let sale = db.sales().add_payment(sale_id, 200).await.unwrap();
        assert_eq!(sale.outstanding_cents, 0);
        assert_eq!(sale.paid_cents, 300);
        assert_eq!(sale.sale_type, SaleType::Paid);

        let err = db.sales().add_payment(sale_id, 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    }

    #[tokio::test]
    async fn test_mismatched_credit_split_writes_nothing() {
        let (db, product_id) = setup().await;

        let mut request = cash(product_id, 3);
        request.sale_type = PaymentTerms::Credit;
        request.paid_cents = Some(100);
        request.outstanding_cents = Some(150);

        let err = db.sales().create(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
        assert_eq!(stock(&db, product_id).await, 10);
        assert!(db.sales().list().await.unwrap().is_empty());
        assert_eq!(db.sequences().last_invoice_number().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_deleted_client_and_product_keep_sale() {
        let (db, product_id) = setup().await;
        let client = db
            .clients()
            .insert(&tendero_core::ClientInput {
                name: "Núñez".to_string(),
                legal_id: "0102".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut request = cash(product_id, 2);
        request.client_id = Some(client.id);
        request.sale_type = PaymentTerms::Credit;
        let sale_id = db.sales().create(&request).await.unwrap();

        let found = db.sales().credits(Some("NÚÑ")).await.unwrap();
        assert_eq!(found.len(), 1);

        db.clients().delete(client.id).await.unwrap();
        db.products().delete(product_id).await.unwrap();

        let sale = db.sales().get_with_items(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.sale.client_id, None);
        assert_eq!(sale.sale.client_name, None);
        assert_eq!(sale.items[0].product_id, None);
        assert_eq!(sale.items[0].product_name, "Arroz");

        // Deleting the sale cannot restore stock to a missing product.
        db.sales().delete(sale_id).await.unwrap();
    }
}

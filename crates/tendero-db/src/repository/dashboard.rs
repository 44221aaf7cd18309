//! # Dashboard Repository
//!
//! Home screen counts in one round trip.

use sqlx::SqlitePool;

use crate::error::DbResult;
use tendero_core::DashboardData;

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    pub async fn data(&self) -> DbResult<DashboardData> {
        let (clients, products, sales, quotes, pending_credits, low_stock_products): (
            i64,
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM clients),
                (SELECT COUNT(*) FROM products),
                (SELECT COUNT(*) FROM sales),
                (SELECT COUNT(*) FROM quotes),
                (SELECT COUNT(*) FROM sales WHERE sale_type = 'credit' AND outstanding_cents > 0),
                (SELECT COUNT(*) FROM products WHERE stock <= min_stock)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardData {
            clients,
            products,
            sales,
            quotes,
            pending_credits,
            low_stock_products,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use tendero_core::{ClientInput, DashboardData, ProductInput};

    #[tokio::test]
    async fn test_counts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.dashboard().data().await.unwrap(), DashboardData::default());

        db.clients()
            .insert(&ClientInput {
                name: "Ana".to_string(),
                legal_id: "1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        db.products()
            .insert(&ProductInput {
                code: "A1".to_string(),
                name: "Arroz".to_string(),
                stock: 1,
                min_stock: 5,
                ..Default::default()
            })
            .await
            .unwrap();

        let data = db.dashboard().data().await.unwrap();
        assert_eq!(data.clients, 1);
        assert_eq!(data.products, 1);
        assert_eq!(data.low_stock_products, 1);
        assert_eq!(data.pending_credits, 0);
    }
}

//! # Company Settings Repository
//!
//! The company profile is a single row (`id = 1`) created by the initial
//! migration. Reads never fail for lack of a row; writes upsert it.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use tendero_core::CompanySettings;

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    pub async fn get(&self) -> DbResult<CompanySettings> {
        let settings = sqlx::query_as::<_, CompanySettings>(
            r#"
            SELECT company_name, legal_id, address, email, phone, logo_path
            FROM company_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings.unwrap_or_default())
    }

    /// Replaces the company profile. Blank strings are stored as NULL.
    pub async fn update(&self, settings: &CompanySettings) -> DbResult<CompanySettings> {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        sqlx::query(
            r#"
            INSERT INTO company_settings (id, company_name, legal_id, address, email, phone, logo_path)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                company_name = excluded.company_name,
                legal_id = excluded.legal_id,
                address = excluded.address,
                email = excluded.email,
                phone = excluded.phone,
                logo_path = excluded.logo_path
            "#,
        )
        .bind(clean(&settings.company_name))
        .bind(clean(&settings.legal_id))
        .bind(clean(&settings.address))
        .bind(clean(&settings.email))
        .bind(clean(&settings.phone))
        .bind(clean(&settings.logo_path))
        .execute(&self.pool)
        .await?;

        info!("Company settings updated");
        self.get().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_singleton_seeded_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.settings().get().await.unwrap(), CompanySettings::default());
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let saved = db
            .settings()
            .update(&CompanySettings {
                company_name: Some("Tienda Don Pepe".to_string()),
                phone: Some("   ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(saved.company_name.as_deref(), Some("Tienda Don Pepe"));
        assert_eq!(saved.phone, None);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company_settings")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}

//! # Category Repository
//!
//! Plain CRUD plus "ensure category", the lookup-or-insert used when a
//! product is saved with a category name.
//!
//! ```text
//! ensure_category(" Bebidas ")
//!      │
//!      ├── blank name?               → None, nothing written
//!      ├── INSERT ... ON CONFLICT DO NOTHING
//!      └── SELECT id WHERE name = 'Bebidas'  → Some(id)
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tendero_core::validation::validate_name;
use tendero_core::{Category, CoreError};

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories ORDER BY name COLLATE NOCASE",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Inserts a category. Duplicate names are a constraint violation.
    pub async fn insert(&self, name: &str) -> DbResult<Category> {
        validate_name("category", name)?;
        let name = name.trim();

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_value(name))?;

        let id = result.last_insert_rowid();
        info!(category_id = id, name = %name, "Category created");

        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    pub async fn update(&self, id: i64, name: &str) -> DbResult<Category> {
        validate_name("category", name)?;
        let name = name.trim();

        let result = sqlx::query("UPDATE categories SET name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_value(name))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CategoryNotFound(id).into());
        }

        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    /// Deletes a category. Its products keep existing, uncategorized.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CategoryNotFound(id).into());
        }

        info!(category_id = id, "Category deleted");
        Ok(())
    }

    /// Resolves a category name to its id, creating the category if needed.
    pub async fn ensure(&self, name: Option<&str>) -> DbResult<Option<i64>> {
        let mut conn = self.pool.acquire().await?;
        ensure_category(&mut conn, name).await
    }
}

/// Lookup-or-insert on the caller's connection.
///
/// Idempotent: calling it twice with the same name yields the same id and
/// a single row. Blank names yield `None`.
pub(crate) async fn ensure_category(
    conn: &mut SqliteConnection,
    name: Option<&str>,
) -> DbResult<Option<i64>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    validate_name("category", name)?;

    sqlx::query("INSERT INTO categories (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *conn)
        .await?;

    let id: i64 = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    debug!(category_id = id, name = %name, "Category resolved");
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tendero_core::error::ErrorKind;

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let first = repo.ensure(Some("Bebidas")).await.unwrap();
        let second = repo.ensure(Some("  Bebidas ")).await.unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_blank_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        assert_eq!(repo.ensure(None).await.unwrap(), None);
        assert_eq!(repo.ensure(Some("   ")).await.unwrap(), None);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let cat = repo.insert("Granos").await.unwrap();
        assert_eq!(
            repo.insert("Granos").await.unwrap_err().kind(),
            ErrorKind::ConstraintViolation
        );

        let renamed = repo.update(cat.id, "Cereales").await.unwrap();
        assert_eq!(renamed.name, "Cereales");

        repo.delete(cat.id).await.unwrap();
        assert_eq!(repo.delete(cat.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}

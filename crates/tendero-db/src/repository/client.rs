//! # Client Repository
//!
//! Database operations for clients.
//!
//! Sales and quotes keep a nullable reference to the client. Deleting a
//! client is unconditional: the schema sets those references to NULL and
//! the documents survive as anonymous.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tendero_core::validation::{validate_client_input, validate_search_term};
use tendero_core::{Client, ClientInput, CoreError};

const CLIENT_COLUMNS: &str = "id, name, legal_id, address, email, phone";

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists clients ordered by name.
    ///
    /// ## Arguments
    /// * `search` - Optional substring of the name or legal id
    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Client>> {
        let search = validate_search_term(search)?;

        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE ?1 IS NULL OR name LIKE '%' || ?1 || '%' OR legal_id LIKE '%' || ?1 || '%' \
             ORDER BY name COLLATE NOCASE"
        );

        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(search)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    /// Gets a client by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");

        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Inserts a new client.
    ///
    /// ## Returns
    /// * `Ok(Client)` - Inserted client with its assigned id
    /// * `Err(DbError::UniqueViolation)` - legal id already registered
    pub async fn insert(&self, input: &ClientInput) -> DbResult<Client> {
        validate_client_input(input)?;

        let name = input.name.trim();
        let legal_id = input.legal_id.trim();

        debug!(legal_id = %legal_id, "Inserting client");

        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, legal_id, address, email, phone)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(name)
        .bind(legal_id)
        .bind(&input.address)
        .bind(&input.email)
        .bind(&input.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(legal_id))?;

        let id = result.last_insert_rowid();
        info!(client_id = id, "Client created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ClientNotFound(id).into())
    }

    /// Replaces every field of an existing client.
    pub async fn update(&self, id: i64, input: &ClientInput) -> DbResult<Client> {
        validate_client_input(input)?;

        let legal_id = input.legal_id.trim();

        debug!(client_id = id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2,
                legal_id = ?3,
                address = ?4,
                email = ?5,
                phone = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(legal_id)
        .bind(&input.address)
        .bind(&input.email)
        .bind(&input.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(legal_id))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ClientNotFound(id).into());
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ClientNotFound(id).into())
    }

    /// Deletes a client. Their sales and quotes become anonymous.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ClientNotFound(id).into());
        }

        info!(client_id = id, "Client deleted");
        Ok(())
    }

    /// Checks that a client exists.
    pub(crate) async fn exists<'e, E>(executor: E, id: i64) -> DbResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM clients WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(found.is_some())
    }
}

//! # Client Commands

use tracing::debug;

use super::CreatedResponse;
use crate::error::ApiResponse;
use crate::state::DbState;
use tendero_core::{Client, ClientInput, CoreError};

/// Lists clients by name, optionally filtered by a name substring.
pub async fn get_clients(db: &DbState, search: Option<String>) -> ApiResponse<Vec<Client>> {
    debug!(search = ?search, "get_clients command");
    let result = db.inner().clients().list(search.as_deref()).await;
    ApiResponse::from_result(result, "Clients loaded")
}

pub async fn get_client(db: &DbState, id: i64) -> ApiResponse<Client> {
    debug!(id = %id, "get_client command");
    let result = db
        .inner()
        .clients()
        .get_by_id(id)
        .await
        .and_then(|found| found.ok_or_else(|| CoreError::ClientNotFound(id).into()));
    ApiResponse::from_result(result, "Client loaded")
}

pub async fn add_client(db: &DbState, input: ClientInput) -> ApiResponse<CreatedResponse> {
    debug!(legal_id = %input.legal_id, "add_client command");
    let result = db.inner().clients().insert(&input).await;
    ApiResponse::from_result(result.map(|c| CreatedResponse { id: c.id }), "Client added")
}

pub async fn update_client(db: &DbState, id: i64, input: ClientInput) -> ApiResponse<Client> {
    debug!(id = %id, "update_client command");
    let result = db.inner().clients().update(id, &input).await;
    ApiResponse::from_result(result, "Client updated")
}

/// Deletes a client. Their sales and quotes stay, without a client.
pub async fn delete_client(db: &DbState, id: i64) -> ApiResponse<()> {
    debug!(id = %id, "delete_client command");
    let result = db.inner().clients().delete(id).await;
    ApiResponse::from_result(result, "Client deleted")
}

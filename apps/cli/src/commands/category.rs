//! # Category Commands

use tracing::debug;

use super::CreatedResponse;
use crate::error::ApiResponse;
use crate::state::DbState;
use tendero_core::Category;

pub async fn get_categories(db: &DbState) -> ApiResponse<Vec<Category>> {
    debug!("get_categories command");
    ApiResponse::from_result(db.inner().categories().list().await, "Categories loaded")
}

pub async fn add_category(db: &DbState, name: String) -> ApiResponse<CreatedResponse> {
    debug!(name = %name, "add_category command");
    let result = db.inner().categories().insert(&name).await;
    ApiResponse::from_result(result.map(|c| CreatedResponse { id: c.id }), "Category added")
}

pub async fn update_category(db: &DbState, id: i64, name: String) -> ApiResponse<Category> {
    debug!(id = %id, name = %name, "update_category command");
    let result = db.inner().categories().update(id, &name).await;
    ApiResponse::from_result(result, "Category updated")
}

/// Deletes a category. Its products become uncategorized.
pub async fn delete_category(db: &DbState, id: i64) -> ApiResponse<()> {
    debug!(id = %id, "delete_category command");
    let result = db.inner().categories().delete(id).await;
    ApiResponse::from_result(result, "Category deleted")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_category_crud() {
        let db = testing::db().await;

        let id = add_category(&db, "Bebidas".to_string()).await.data.unwrap().id;
        let renamed = update_category(&db, id, "Lácteos".to_string()).await;
        assert_eq!(renamed.data.unwrap().name, "Lácteos");

        let duplicate = add_category(&db, "Lácteos".to_string()).await;
        assert_eq!(duplicate.code, Some(ErrorCode::ConstraintViolation));

        assert!(delete_category(&db, id).await.success);
        assert!(get_categories(&db).await.data.unwrap().is_empty());
    }
}

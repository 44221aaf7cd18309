//! # Company Settings Commands

use tracing::debug;

use crate::error::ApiResponse;
use crate::state::DbState;
use tendero_core::CompanySettings;

pub async fn get_company_settings(db: &DbState) -> ApiResponse<CompanySettings> {
    debug!("get_company_settings command");
    ApiResponse::from_result(db.inner().settings().get().await, "Settings loaded")
}

/// Replaces the company profile. Blank fields are cleared.
pub async fn update_company_settings(
    db: &DbState,
    settings: CompanySettings,
) -> ApiResponse<CompanySettings> {
    debug!(company_name = ?settings.company_name, "update_company_settings command");
    let result = db.inner().settings().update(&settings).await;
    ApiResponse::from_result(result, "Settings updated")
}

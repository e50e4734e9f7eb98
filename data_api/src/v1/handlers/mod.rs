use crate::state::AppState;
use crate::v1::error::ApiError;
use shared::database::queries::table_exists;

pub mod columns;
pub mod ingestion;
pub mod stations;

/// Separates "never ingested" from "no rows match".
pub async fn ensure_store_built(state: &AppState) -> Result<(), ApiError> {
    if table_exists(&state.pool, &state.table_name).await? {
        Ok(())
    } else {
        Err(ApiError::StoreNotBuilt)
    }
}

use crate::state::AppState;
use crate::v1::error::ApiError;
use axum::Json;
use axum::extract::State;
use shared::database::models::IngestionRun;
use shared::database::queries;

pub async fn get_latest_ingestion(
    State(state): State<AppState>,
) -> Result<Json<IngestionRun>, ApiError> {
    queries::latest_ingestion_run(&state.pool, &state.table_name)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "no ingestion run recorded for table {}",
                state.table_name
            ))
        })
}

use crate::state::AppState;
use crate::v1::api_models::{ColumnValuesResponse, ColumnsResponse};
use crate::v1::error::ApiError;
use crate::v1::handlers::ensure_store_built;
use axum::Json;
use axum::extract::{Path, State};
use shared::database::queries;
use shared::smp::{COLUMNS, StationColumn};

pub async fn get_columns() -> Json<ColumnsResponse> {
    Json(ColumnsResponse { columns: &COLUMNS })
}

/// Distinct values of a categorical column, for filter pickers.
pub async fn get_column_values(
    State(state): State<AppState>,
    Path(column): Path<String>,
) -> Result<Json<ColumnValuesResponse>, ApiError> {
    let column: StationColumn = column.parse()?;
    ensure_store_built(&state).await?;

    let values = queries::list_distinct_values(&state.pool, &state.table_name, column).await?;
    Ok(Json(ColumnValuesResponse { column, values }))
}

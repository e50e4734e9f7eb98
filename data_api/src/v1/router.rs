use crate::state::AppState;
use crate::v1::handlers::columns::{get_column_values, get_columns};
use crate::v1::handlers::ingestion::get_latest_ingestion;
use crate::v1::handlers::stations::{count_stations, find_nearby_stations, search_stations};
use axum::Router;
use axum::routing::{get, post};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/columns", get(get_columns))
        .route("/columns/{column}/values", get(get_column_values))
        .route("/stations/search", post(search_stations))
        .route("/stations/counts", post(count_stations))
        .route("/stations/nearby", post(find_nearby_stations))
        .route("/ingestion/latest", get(get_latest_ingestion))
        .with_state(state)
}

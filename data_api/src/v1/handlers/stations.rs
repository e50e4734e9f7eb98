use crate::state::AppState;
use crate::v1::api_models::{
    CountsRequest, CountsResponse, NearbyRequest, NearbyResponse, SearchRequest,
    StationsResponse, clamp_limit, parse_filters,
};
use crate::v1::error::ApiError;
use crate::v1::extractors::ValidJson;
use crate::v1::handlers::ensure_store_built;
use axum::Json;
use axum::extract::State;
use shared::database::queries;
use shared::geo::{self, Coordinate};
use shared::smp::StationColumn;
use tracing::debug;

pub async fn search_stations(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SearchRequest>,
) -> Result<Json<StationsResponse>, ApiError> {
    let filters = parse_filters(request.filters)?;
    let limit = clamp_limit(request.limit);
    ensure_store_built(&state).await?;

    let stations =
        queries::filter_by_columns(&state.pool, &state.table_name, &filters, Some(limit)).await?;
    Ok(Json(StationsResponse {
        count: stations.len(),
        limit,
        stations,
    }))
}

pub async fn count_stations(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CountsRequest>,
) -> Result<Json<CountsResponse>, ApiError> {
    let group_by: StationColumn = request.group_by.parse()?;
    let filters = parse_filters(request.filters)?;
    ensure_store_built(&state).await?;

    let counts = queries::count_by(&state.pool, &state.table_name, group_by, &filters).await?;
    Ok(Json(CountsResponse { group_by, counts }))
}

/// Stations inside the radius among those matching the filters, closest
/// first. The limit applies after sorting.
pub async fn find_nearby_stations(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<NearbyRequest>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let origin = Coordinate::new(request.latitude, request.longitude)?;
    let radius_km = geo::validate_radius(request.radius_km)?;
    let filters = parse_filters(request.filters)?;
    let limit = clamp_limit(request.limit);
    ensure_store_built(&state).await?;

    let candidates =
        queries::filter_by_columns(&state.pool, &state.table_name, &filters, None).await?;
    let scanned = candidates.len();
    let mut stations = geo::find_nearby(origin, radius_km, candidates)?;
    debug!(scanned, within_radius = stations.len(), "nearby scan finished");
    stations.truncate(limit as usize);

    Ok(Json(NearbyResponse {
        origin,
        radius_km,
        count: stations.len(),
        stations,
    }))
}

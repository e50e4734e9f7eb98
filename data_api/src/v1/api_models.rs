use serde::{Deserialize, Serialize};
use shared::database::models::{ColumnFilter, ValueCount};
use shared::geo::{Coordinate, NearbyStation};
use shared::smp::{ColumnSpec, StationColumn, StationRecord, UnknownColumnError};
use std::collections::BTreeMap;

pub const DEFAULT_LIMIT: u32 = 1000;
pub const MAX_LIMIT: u32 = 5000;

/// Column key (or label, or source header) to accepted values.
pub type RawFilters = BTreeMap<String, Vec<String>>;

pub fn parse_filters(raw: RawFilters) -> Result<Vec<ColumnFilter>, UnknownColumnError> {
    raw.into_iter()
        .map(|(column, values)| {
            column
                .parse::<StationColumn>()
                .map(|column| ColumnFilter::new(column, values))
        })
        .collect()
}

pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub filters: RawFilters,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsRequest {
    pub group_by: String,
    #[serde(default)]
    pub filters: RawFilters,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    #[serde(default)]
    pub filters: RawFilters,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ColumnsResponse {
    pub columns: &'static [ColumnSpec],
}

#[derive(Serialize)]
pub struct ColumnValuesResponse {
    pub column: StationColumn,
    pub values: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsResponse {
    pub count: usize,
    pub limit: u32,
    pub stations: Vec<StationRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsResponse {
    pub group_by: StationColumn,
    pub counts: Vec<ValueCount>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub origin: Coordinate,
    pub radius_km: f64,
    pub count: usize,
    pub stations: Vec<NearbyStation>,
}

use crate::smp::StationColumn;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRun {
    pub id: Uuid,
    pub table_name: String,
    pub source_path: String,
    pub rows_read: i64,
    pub rows_stored: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

/// Keeps rows whose `column` equals any of `values`. An empty value list
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: StationColumn,
    pub values: Vec<String>,
}

impl ColumnFilter {
    pub fn new<I, S>(column: StationColumn, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

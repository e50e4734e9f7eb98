use shared::database::queries::{QueryError, validate_table_name};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Station table served by this instance; validated once at startup.
    pub table_name: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, table_name: &str) -> Result<Self, QueryError> {
        validate_table_name(table_name)?;
        Ok(Self {
            pool,
            table_name: Arc::from(table_name),
        })
    }
}

use shared::database::queries::QueryError;
use shared::error::InitializationError;
use shared::freshness::FreshnessError;
use shared::smp::NormalizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngesterMainError {
    #[error("failed to initialize station ingester: {0}")]
    Initialization(#[from] InitializationError),
    #[error("station ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("source could not be normalized: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("store could not be rebuilt: {0}")]
    Query(#[from] QueryError),
    #[error("freshness marker error: {0}")]
    Freshness(#[from] FreshnessError),
}

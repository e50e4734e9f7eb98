mod error;
mod pipeline;

use crate::error::IngesterMainError;
use crate::pipeline::{IngestOutcome, run_ingestion};
use shared::error::InitializationError;
use shared::freshness::{DailyRefreshGate, FileFreshnessRepository, SystemClock};
use shared::{init_tracing, initialize_db, load_config};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), IngesterMainError> {
    init_tracing()?;

    // Set up config
    let config = load_config().map_err(InitializationError::from)?;

    // Initialize DB
    let pool = initialize_db(&config.sqlite, true).await?;

    let gate = DailyRefreshGate::new(
        SystemClock,
        FileFreshnessRepository::new(config.ingest.freshness_marker.clone()),
    );

    let outcome = run_ingestion(&pool, &config.ingest, &gate).await;
    pool.close().await;

    match outcome {
        Ok(IngestOutcome::Fresh) => info!("station store is up to date"),
        Ok(IngestOutcome::Rebuilt(run)) => info!(
            run_id = %run.id,
            table = run.table_name,
            rows_stored = run.rows_stored,
            "station store rebuilt"
        ),
        Err(e) => {
            // The previous table, if any, is still intact at this point
            error!(error = %e, "station ingestion failed, existing store left untouched");
            return Err(e.into());
        }
    }

    Ok(())
}

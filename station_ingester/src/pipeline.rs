use crate::error::IngestionError;
use chrono::Utc;
use shared::IngestConfig;
use shared::database::models::IngestionRun;
use shared::database::queries::{replace_station_table, table_exists};
use shared::freshness::{Clock, DailyRefreshGate, FreshnessRepository};
use shared::smp::normalize;
use sqlx::SqlitePool;
use tracing::{info, instrument};

#[derive(Debug)]
pub enum IngestOutcome {
    /// Store was already rebuilt today; nothing was read or written.
    Fresh,
    Rebuilt(IngestionRun),
}

/// Rebuilds the station table from the configured source unless the gate
/// reports it current. A missing table always forces a rebuild.
#[instrument(skip_all, fields(table = %config.table_name, source = %config.source_path.display()))]
pub async fn run_ingestion<C: Clock, R: FreshnessRepository>(
    pool: &SqlitePool,
    config: &IngestConfig,
    gate: &DailyRefreshGate<C, R>,
) -> Result<IngestOutcome, IngestionError> {
    let table_present = table_exists(pool, &config.table_name).await?;

    if config.force {
        info!("forced rebuild requested");
    } else if !table_present {
        info!("station table does not exist yet, rebuilding");
    } else if !gate.needs_rebuild()? {
        info!(name: "ingest.skipped", "station store already rebuilt today, skipping ingestion");
        return Ok(IngestOutcome::Fresh);
    }

    let normalized = normalize(&config.source_path)?;
    let run = replace_station_table(
        pool,
        &config.table_name,
        &config.source_path.display().to_string(),
        &normalized,
        Utc::now(),
    )
    .await?;
    let rebuilt_on = gate.mark_rebuilt()?;

    info!(
        name: "ingest.completed",
        run_id = %run.id,
        rows_read = run.rows_read,
        rows_stored = run.rows_stored,
        %rebuilt_on,
        "station store rebuilt"
    );
    Ok(IngestOutcome::Rebuilt(run))
}

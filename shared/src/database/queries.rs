use crate::database::models::{ColumnFilter, IngestionRun, ValueCount};
use crate::smp::{COLUMNS, Cell, ColumnKind, Normalized, StationColumn, StationRecord};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Rows per INSERT; 20 binds each keeps a statement well under SQLite's
/// host parameter limit.
const INSERT_CHUNK_ROWS: usize = 400;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    #[error("illegal args for query: {0}")]
    IllegalArgs(String),
}

/// Tables owned by the migrations; a station table must never replace them.
const RESERVED_TABLES: [&str; 2] = ["ingestion_runs", "_sqlx_migrations"];

/// Table names are interpolated into SQL, so only plain identifiers pass.
pub fn validate_table_name(table_name: &str) -> Result<(), QueryError> {
    let lowercase = table_name.to_ascii_lowercase();
    let mut chars = table_name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !lowercase.starts_with("sqlite_")
        && !RESERVED_TABLES.contains(&lowercase.as_str());
    if valid {
        Ok(())
    } else {
        Err(QueryError::IllegalArgs(format!(
            "{table_name:?} is not a valid table name"
        )))
    }
}

fn require_text_column(column: StationColumn) -> Result<(), QueryError> {
    if column.is_text() {
        Ok(())
    } else {
        Err(QueryError::IllegalArgs(format!(
            "column {column} is numeric and cannot be used as a category"
        )))
    }
}

fn create_table_sql(table_name: &str) -> String {
    let columns = COLUMNS
        .iter()
        .map(|spec| {
            let sql_type = match spec.kind {
                ColumnKind::Integer => "INTEGER",
                ColumnKind::Float => "REAL",
                ColumnKind::Text => "TEXT",
            };
            let nullability = if spec.mandatory || spec.kind == ColumnKind::Text {
                " NOT NULL"
            } else {
                ""
            };
            format!("\"{}\" {sql_type}{nullability}", spec.key)
        })
        .collect::<Vec<_>>()
        .join(",\n    ");
    format!("CREATE TABLE \"{table_name}\"\n(\n    {columns}\n)")
}

fn column_list() -> String {
    COLUMNS
        .iter()
        .map(|spec| format!("\"{}\"", spec.key))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filters: &[ColumnFilter]) {
    builder.push(" WHERE 1 = 1");
    for filter in filters {
        if filter.values.is_empty() {
            builder.push(" AND 0");
            continue;
        }
        builder.push(format!(" AND \"{}\" IN (", filter.column.key()));
        let mut values = builder.separated(", ");
        for value in &filter.values {
            values.push_bind(value.clone());
        }
        values.push_unseparated(")");
    }
}

/// Replaces `table_name` with `normalized.records` in one transaction.
///
/// Rows go into a staging table that is renamed over the old one before
/// commit, so readers never observe a partially written table. The run is
/// recorded in `ingestion_runs` inside the same transaction.
#[instrument(skip(pool, normalized), fields(rows = normalized.records.len()))]
pub async fn replace_station_table(
    pool: &SqlitePool,
    table_name: &str,
    source_path: &str,
    normalized: &Normalized,
    completed_at: DateTime<Utc>,
) -> Result<IngestionRun, QueryError> {
    validate_table_name(table_name)?;
    let staging = format!("{table_name}__staging");
    let columns = column_list();

    let mut tx = pool.begin().await?;

    sqlx::query(&format!("DROP TABLE IF EXISTS \"{staging}\""))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&create_table_sql(&staging))
        .execute(&mut *tx)
        .await?;

    for chunk in normalized.records.chunks(INSERT_CHUNK_ROWS) {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("INSERT INTO \"{staging}\" ({columns}) "));
        builder.push_values(chunk, |mut row, record| {
            for spec in &COLUMNS {
                match record.cell(spec.column) {
                    Cell::Integer(value) => row.push_bind(value),
                    Cell::Float(value) => row.push_bind(value),
                    Cell::Text(value) => row.push_bind(value.to_owned()),
                };
            }
        });
        builder.build().execute(&mut *tx).await?;
        debug!(rows = chunk.len(), "inserted station chunk into staging table");
    }

    sqlx::query(&format!("DROP TABLE IF EXISTS \"{table_name}\""))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!(
        "ALTER TABLE \"{staging}\" RENAME TO \"{table_name}\""
    ))
    .execute(&mut *tx)
    .await?;

    let run = IngestionRun {
        id: Uuid::now_v7(),
        table_name: table_name.to_string(),
        source_path: source_path.to_string(),
        rows_read: normalized.rows_read as i64,
        rows_stored: normalized.records.len() as i64,
        completed_at,
    };
    sqlx::query(
        r"
        INSERT INTO ingestion_runs (id, table_name, source_path, rows_read, rows_stored, completed_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(run.id)
    .bind(&run.table_name)
    .bind(&run.source_path)
    .bind(run.rows_read)
    .bind(run.rows_stored)
    .bind(run.completed_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        name: "store.replaced",
        run_id = %run.id,
        rows_stored = run.rows_stored,
        "replaced station table"
    );
    Ok(run)
}

pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, QueryError> {
    validate_table_name(table_name)?;
    let count = sqlx::query_scalar::<_, i64>(
        r"
        SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?
        ",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Every stored station in source order.
pub async fn load_stations(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<Vec<StationRecord>, QueryError> {
    filter_by_columns(pool, table_name, &[], None).await
}

/// Distinct non-empty values of a categorical column, sorted.
pub async fn list_distinct_values(
    pool: &SqlitePool,
    table_name: &str,
    column: StationColumn,
) -> Result<Vec<String>, QueryError> {
    validate_table_name(table_name)?;
    require_text_column(column)?;
    let key = column.key();

    sqlx::query_scalar::<_, String>(&format!(
        "SELECT DISTINCT \"{key}\" FROM \"{table_name}\" WHERE \"{key}\" <> '' ORDER BY \"{key}\""
    ))
    .fetch_all(pool)
    .await
    .map_err(QueryError::Sql)
}

/// Stations matching every filter, in source order, at most `limit` rows.
pub async fn filter_by_columns(
    pool: &SqlitePool,
    table_name: &str,
    filters: &[ColumnFilter],
    limit: Option<u32>,
) -> Result<Vec<StationRecord>, QueryError> {
    validate_table_name(table_name)?;
    for filter in filters {
        require_text_column(filter.column)?;
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM \"{table_name}\"", column_list()));
    push_filters(&mut builder, filters);
    builder.push(" ORDER BY rowid");
    if let Some(limit) = limit {
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(limit));
    }

    builder
        .build_query_as::<StationRecord>()
        .fetch_all(pool)
        .await
        .map_err(QueryError::Sql)
}

/// Station count per value of `group_by`, largest first.
pub async fn count_by(
    pool: &SqlitePool,
    table_name: &str,
    group_by: StationColumn,
    filters: &[ColumnFilter],
) -> Result<Vec<ValueCount>, QueryError> {
    validate_table_name(table_name)?;
    require_text_column(group_by)?;
    for filter in filters {
        require_text_column(filter.column)?;
    }
    let key = group_by.key();

    let mut builder = QueryBuilder::<Sqlite>::new(format!(
        "SELECT \"{key}\" AS value, COUNT(*) AS count FROM \"{table_name}\""
    ));
    push_filters(&mut builder, filters);
    builder.push(format!(
        " GROUP BY \"{key}\" ORDER BY count DESC, value ASC"
    ));

    builder
        .build_query_as::<ValueCount>()
        .fetch_all(pool)
        .await
        .map_err(QueryError::Sql)
}

pub async fn latest_ingestion_run(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<Option<IngestionRun>, QueryError> {
    sqlx::query_as::<_, IngestionRun>(
        r"
        SELECT id, table_name, source_path, rows_read, rows_stored, completed_at
        FROM ingestion_runs
        WHERE table_name = ?
        ORDER BY rowid DESC
        LIMIT 1
        ",
    )
    .bind(table_name)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::Sql)
}

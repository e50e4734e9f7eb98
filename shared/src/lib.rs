pub mod database;
pub mod freshness;
pub mod geo;
pub mod smp;

use crate::error::{ConfigError, InitializationError};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

pub const ENV_VAR_PREFIX: &str = "SMP_STATIONS__";
pub const SETTINGS_FILE: &str = "Settings.toml";
pub const DEFAULT_TABLE_NAME: &str = "estacoes";

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub sqlite: SqliteConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SqliteConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IngestConfig {
    pub source_path: PathBuf,
    pub table_name: String,
    pub freshness_marker: PathBuf,
    /// Rebuild even when the freshness marker says the store is current.
    pub force: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("src/Estacoes_SMP.csv"),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            freshness_marker: PathBuf::from("last_update.txt"),
            force: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    pub table_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(SETTINGS_FILE)
}

pub fn load_config_from(settings_file: impl AsRef<Path>) -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(settings_file.as_ref()))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .extract::<Config>()?)
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] ConfigError),
        #[error(transparent)]
        Migration(#[from] sqlx::migrate::MigrateError),
        #[error(transparent)]
        Db(#[from] sqlx::Error),
    }
}

pub fn init_tracing() -> Result<(), InitializationError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[instrument(skip_all, fields(url = %sqlite_config.database_url))]
pub async fn initialize_db(
    sqlite_config: &SqliteConfig,
    migrate: bool,
) -> Result<SqlitePool, InitializationError> {
    let options =
        SqliteConnectOptions::from_str(&sqlite_config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(sqlite_config.max_connections)
        .connect_with(options)
        .await?;

    info!(name: "db.connected", "db pool created and connected");

    if migrate {
        MIGRATOR.run(&pool).await?;
    }

    Ok(pool)
}

pub async fn shutdown_listener(token: Option<CancellationToken>) {
    let ctrl_c = signal::ctrl_c();
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = ?e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(name: "signal.ctrlc.received", "received Ctrl+C signal, shutting down"),
        _ = terminate => info!(name: "signal.sigterm.received", "received SIGTERM signal, shutting down"),
    }

    if let Some(token) = token {
        token.cancel();
    }
}

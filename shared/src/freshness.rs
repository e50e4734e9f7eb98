//! Daily refresh gate: decides whether today's rebuild of the station store
//! has already happened.

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const MARKER_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum FreshnessError {
    #[error("failed to read freshness marker {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write freshness marker {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The host's local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub trait FreshnessRepository {
    fn last_rebuilt(&self) -> Result<Option<NaiveDate>, FreshnessError>;
    fn record_rebuilt(&self, date: NaiveDate) -> Result<(), FreshnessError>;
}

/// Marker file holding the date of the last rebuild as `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct FileFreshnessRepository {
    path: PathBuf,
}

impl FileFreshnessRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FreshnessRepository for FileFreshnessRepository {
    fn last_rebuilt(&self) -> Result<Option<NaiveDate>, FreshnessError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(FreshnessError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match NaiveDate::parse_from_str(contents.trim(), MARKER_DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable freshness marker"
                );
                Ok(None)
            }
        }
    }

    fn record_rebuilt(&self, date: NaiveDate) -> Result<(), FreshnessError> {
        fs::write(
            &self.path,
            format!("{}\n", date.format(MARKER_DATE_FORMAT)),
        )
        .map_err(|source| FreshnessError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps the marker in memory, for ephemeral stores.
#[derive(Debug, Default)]
pub struct InMemoryFreshnessRepository {
    last: Mutex<Option<NaiveDate>>,
}

impl InMemoryFreshnessRepository {
    pub fn with_last_rebuilt(date: NaiveDate) -> Self {
        Self {
            last: Mutex::new(Some(date)),
        }
    }
}

impl FreshnessRepository for InMemoryFreshnessRepository {
    fn last_rebuilt(&self) -> Result<Option<NaiveDate>, FreshnessError> {
        Ok(*self.last.lock())
    }

    fn record_rebuilt(&self, date: NaiveDate) -> Result<(), FreshnessError> {
        *self.last.lock() = Some(date);
        Ok(())
    }
}

pub struct DailyRefreshGate<C, R> {
    clock: C,
    repository: R,
}

impl<C: Clock, R: FreshnessRepository> DailyRefreshGate<C, R> {
    pub fn new(clock: C, repository: R) -> Self {
        Self { clock, repository }
    }

    /// True unless the store was already rebuilt today.
    pub fn needs_rebuild(&self) -> Result<bool, FreshnessError> {
        let today = self.clock.today();
        let last = self.repository.last_rebuilt()?;
        debug!(%today, last_rebuilt = ?last, "checked freshness marker");
        Ok(last != Some(today))
    }

    pub fn mark_rebuilt(&self) -> Result<NaiveDate, FreshnessError> {
        let today = self.clock.today();
        self.repository.record_rebuilt(today)?;
        Ok(today)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

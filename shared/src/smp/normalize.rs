use crate::smp::columns::{COLUMN_COUNT, COLUMNS, ColumnKind, ColumnSpec, StationColumn};
use crate::smp::record::StationRecord;
use csv::{ByteRecord, ReaderBuilder};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to open station source {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed station source: {0}")]
    Csv(#[from] csv::Error),
    #[error("station source is missing expected columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("station source line {line} has {found} fields, header has {expected}")]
    TooManyFields {
        line: u64,
        found: usize,
        expected: usize,
    },
}

/// Result of a normalization pass. `records` keeps source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub records: Vec<StationRecord>,
    pub rows_read: usize,
}

impl Normalized {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Integer(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
}

impl CellValue {
    fn is_absent(&self) -> bool {
        match self {
            CellValue::Integer(v) => v.is_none(),
            CellValue::Float(v) => v.is_none(),
            CellValue::Text(v) => v.is_none(),
        }
    }
}

/// Normalizes the semicolon-delimited station export at `path`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn normalize(path: impl AsRef<Path>) -> Result<Normalized, NormalizeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| NormalizeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    normalize_reader(BufReader::new(file))
}

pub fn normalize_reader<R: Read>(reader: R) -> Result<Normalized, NormalizeError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.byte_headers()?;
    let expected = headers.len();
    let positions = resolve_header_positions(headers)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut raw = ByteRecord::new();
    while reader.read_byte_record(&mut raw)? {
        rows_read += 1;
        // Short rows read as blanks in their missing cells; extra cells
        // cannot be attributed to any column.
        if raw.len() > expected {
            return Err(NormalizeError::TooManyFields {
                line: raw.position().map_or(0, |p| p.line()),
                found: raw.len(),
                expected,
            });
        }
        let cells: Vec<CellValue> = COLUMNS
            .iter()
            .zip(positions)
            .map(|(spec, idx)| coerce(spec, raw.get(idx).unwrap_or_default()))
            .collect();

        if let Some(missing) = COLUMNS
            .iter()
            .zip(&cells)
            .find(|(spec, cell)| spec.mandatory && cell.is_absent())
        {
            debug!(
                line = raw.position().map(|p| p.line()),
                column = missing.0.key,
                "dropping station row missing a mandatory value"
            );
            continue;
        }

        if let Some(record) = StationRecord::from_cells(cells) {
            records.push(record);
        }
    }

    let normalized = Normalized { records, rows_read };
    info!(
        name: "normalize.completed",
        rows_read,
        rows_kept = normalized.records.len(),
        rows_dropped = normalized.rows_dropped(),
        "normalized station source"
    );
    Ok(normalized)
}

fn resolve_header_positions(
    headers: &ByteRecord,
) -> Result<[usize; COLUMN_COUNT], NormalizeError> {
    let names: Vec<String> = headers
        .iter()
        .map(|h| {
            decode(h)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect();

    let mut positions = [0usize; COLUMN_COUNT];
    let mut missing = Vec::new();
    for (slot, spec) in positions.iter_mut().zip(&COLUMNS) {
        match names.iter().position(|name| name == spec.header) {
            Some(idx) => *slot = idx,
            None => missing.push(spec.header.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(NormalizeError::MissingColumns(missing))
    }
}

fn decode(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

fn coerce(spec: &ColumnSpec, raw: &[u8]) -> CellValue {
    match spec.kind {
        ColumnKind::Text => CellValue::Text(coerce_text(raw)),
        ColumnKind::Integer => CellValue::Integer(coerce_integer(raw)),
        ColumnKind::Float => CellValue::Float(coerce_float(raw).filter(|v| match spec.bounds {
            Some((min, max)) => (min..=max).contains(v),
            None => true,
        })),
    }
}

pub(crate) fn coerce_text(raw: &[u8]) -> Option<String> {
    let text = decode(raw);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Whole numbers written as floats (`"123.0"`) are accepted.
pub(crate) fn coerce_integer(raw: &[u8]) -> Option<i64> {
    let text = coerce_text(raw)?;
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    let value = parse_float(&text)?;
    (value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then_some(value as i64)
}

pub(crate) fn coerce_float(raw: &[u8]) -> Option<f64> {
    parse_float(&coerce_text(raw)?)
}

fn parse_float(text: &str) -> Option<f64> {
    let parsed = match text.parse::<f64>() {
        Ok(value) => Some(value),
        // Decimal comma, as written by pt-BR spreadsheets
        Err(_) if !text.contains('.') && text.matches(',').count() == 1 => {
            text.replace(',', ".").parse::<f64>().ok()
        }
        Err(_) => None,
    };
    parsed.filter(|v| v.is_finite())
}

struct ProjectedRow(Vec<CellValue>);

impl ProjectedRow {
    fn text(&mut self, column: StationColumn) -> String {
        match &mut self.0[column as usize] {
            CellValue::Text(value) => value.take().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn integer(&self, column: StationColumn) -> Option<i64> {
        match self.0[column as usize] {
            CellValue::Integer(value) => value,
            _ => None,
        }
    }

    fn float(&self, column: StationColumn) -> Option<f64> {
        match self.0[column as usize] {
            CellValue::Float(value) => value,
            _ => None,
        }
    }
}

impl StationRecord {
    fn from_cells(cells: Vec<CellValue>) -> Option<Self> {
        use StationColumn as C;
        let mut row = ProjectedRow(cells);
        Some(Self {
            station_id: row.integer(C::StationId),
            freq_tx_mhz: row.float(C::FreqTxMhz),
            freq_rx_mhz: row.float(C::FreqRxMhz),
            latitude: row.float(C::Latitude)?,
            longitude: row.float(C::Longitude)?,
            emission_designation: row.text(C::EmissionDesignation),
            technology: row.text(C::Technology),
            latitude_text: row.text(C::LatitudeText),
            longitude_text: row.text(C::LongitudeText),
            address: row.text(C::Address),
            neighborhood: row.text(C::Neighborhood),
            address_number: row.text(C::AddressNumber),
            address_complement: row.text(C::AddressComplement),
            postal_code: row.text(C::PostalCode),
            operator: row.text(C::Operator),
            range_band: row.text(C::RangeBand),
            sub_band: row.text(C::SubBand),
            generation: row.text(C::Generation),
            municipality: row.text(C::Municipality),
            uf: row.text(C::Uf),
        })
    }
}

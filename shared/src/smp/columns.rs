use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use ColumnKind::{Float, Integer, Text};
use StationColumn as C;

pub const COLUMN_COUNT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// Every column kept from the SMP export. Discriminants index [`COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationColumn {
    StationId,
    FreqTxMhz,
    FreqRxMhz,
    EmissionDesignation,
    Technology,
    LatitudeText,
    LongitudeText,
    Latitude,
    Longitude,
    Address,
    Neighborhood,
    AddressNumber,
    AddressComplement,
    PostalCode,
    Operator,
    RangeBand,
    SubBand,
    Generation,
    Municipality,
    Uf,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    #[serde(skip)]
    pub column: StationColumn,
    /// Header in the source CSV.
    pub header: &'static str,
    /// Column name in the store and key used by queries.
    pub key: &'static str,
    /// Display name shown by the dashboard.
    pub label: &'static str,
    pub kind: ColumnKind,
    /// Rows missing this value after coercion are dropped.
    pub mandatory: bool,
    /// Inclusive bounds; values outside are treated as unparseable.
    #[serde(skip)]
    pub bounds: Option<(f64, f64)>,
}

const fn spec(
    column: StationColumn,
    header: &'static str,
    key: &'static str,
    label: &'static str,
    kind: ColumnKind,
    mandatory: bool,
) -> ColumnSpec {
    ColumnSpec {
        column,
        header,
        key,
        label,
        kind,
        mandatory,
        bounds: None,
    }
}

const fn coordinate(
    column: StationColumn,
    header: &'static str,
    key: &'static str,
    limit: f64,
) -> ColumnSpec {
    ColumnSpec {
        column,
        header,
        key,
        label: header,
        kind: ColumnKind::Float,
        mandatory: true,
        bounds: Some((-limit, limit)),
    }
}

pub static COLUMNS: [ColumnSpec; COLUMN_COUNT] = [
    spec(C::StationId, "Número Estação", "station_id", "Número Estação", Integer, false),
    spec(C::FreqTxMhz, "FreqTxMHz", "freq_tx_mhz", "FreqTxMHz", Float, false),
    spec(C::FreqRxMhz, "FreqRxMHz", "freq_rx_mhz", "FreqRxMHz", Float, false),
    spec(C::EmissionDesignation, "Designação Emissão", "emission_designation", "Designação Emissão", Text, false),
    spec(C::Technology, "Tecnologia", "technology", "Tecnologia", Text, false),
    spec(C::LatitudeText, "Latitude", "latitude_text", "Latitude", Text, false),
    spec(C::LongitudeText, "Longitude", "longitude_text", "Longitude", Text, false),
    coordinate(C::Latitude, "Latitude decimal", "latitude", 90.0),
    coordinate(C::Longitude, "Longitude decimal", "longitude", 180.0),
    spec(C::Address, "EnderecoEstacao", "address", "Endereço", Text, true),
    spec(C::Neighborhood, "EndBairro", "neighborhood", "Bairro", Text, true),
    spec(C::AddressNumber, "EndNumero", "address_number", "EndNumero", Text, false),
    spec(C::AddressComplement, "EndComplemento", "address_complement", "EndComplemento", Text, false),
    spec(C::PostalCode, "Cep", "postal_code", "Cep", Text, false),
    spec(C::Operator, "Empresa Estação", "operator", "Operadora", Text, false),
    spec(C::RangeBand, "Faixa Estação", "range_band", "Faixa Estação", Text, false),
    spec(C::SubBand, "Subfaixa Estação", "sub_band", "Subfaixa Estação", Text, false),
    spec(C::Generation, "Geração", "generation", "Geração", Text, false),
    spec(C::Municipality, "Município-UF", "municipality", "Município-UF", Text, true),
    spec(C::Uf, "UF", "uf", "UF", Text, true),
];

#[derive(Debug, Error)]
#[error("unknown station column {0}")]
pub struct UnknownColumnError(pub String);

impl StationColumn {
    pub fn spec(self) -> &'static ColumnSpec {
        &COLUMNS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn is_text(self) -> bool {
        self.spec().kind == ColumnKind::Text
    }

    pub fn all() -> impl Iterator<Item = StationColumn> {
        COLUMNS.iter().map(|spec| spec.column)
    }
}

impl fmt::Display for StationColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Accepts the store key, the display label or the source header.
impl FromStr for StationColumn {
    type Err = UnknownColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        COLUMNS
            .iter()
            .find(|spec| spec.key == s)
            .or_else(|| COLUMNS.iter().find(|spec| spec.label == s))
            .or_else(|| COLUMNS.iter().find(|spec| spec.header == s))
            .map(|spec| spec.column)
            .ok_or_else(|| UnknownColumnError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_table_is_indexed_by_discriminant() {
        for (idx, spec) in COLUMNS.iter().enumerate() {
            assert_eq!(spec.column as usize, idx, "{} out of place", spec.key);
        }
    }

    #[test]
    fn renamed_columns_resolve_to_the_same_column() {
        assert_eq!("operator".parse::<StationColumn>().unwrap(), StationColumn::Operator);
        assert_eq!("Operadora".parse::<StationColumn>().unwrap(), StationColumn::Operator);
        assert_eq!(
            "Empresa Estação".parse::<StationColumn>().unwrap(),
            StationColumn::Operator
        );
        assert_eq!("Bairro".parse::<StationColumn>().unwrap(), StationColumn::Neighborhood);
        assert_eq!("Endereço".parse::<StationColumn>().unwrap(), StationColumn::Address);
    }

    #[test]
    fn latitude_label_prefers_textual_column() {
        // "Latitude" is both a header and a label of the textual column
        assert_eq!("Latitude".parse::<StationColumn>().unwrap(), StationColumn::LatitudeText);
        assert_eq!("latitude".parse::<StationColumn>().unwrap(), StationColumn::Latitude);
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert!("Cor".parse::<StationColumn>().is_err());
    }

    #[test]
    fn mandatory_set_matches_record_invariants() {
        let mandatory: Vec<_> = COLUMNS
            .iter()
            .filter(|spec| spec.mandatory)
            .map(|spec| spec.column)
            .collect();
        assert_eq!(
            mandatory,
            vec![
                StationColumn::Latitude,
                StationColumn::Longitude,
                StationColumn::Address,
                StationColumn::Neighborhood,
                StationColumn::Municipality,
                StationColumn::Uf,
            ]
        );
    }
}

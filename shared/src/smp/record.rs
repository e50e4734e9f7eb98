use crate::geo::Coordinate;
use crate::smp::columns::StationColumn;
use serde::{Deserialize, Serialize};

/// One normalized station registration. Text fields hold an empty string
/// when the source cell was blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub station_id: Option<i64>,
    pub freq_tx_mhz: Option<f64>,
    pub freq_rx_mhz: Option<f64>,
    pub emission_designation: String,
    pub technology: String,
    pub latitude_text: String,
    pub longitude_text: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub neighborhood: String,
    pub address_number: String,
    pub address_complement: String,
    pub postal_code: String,
    pub operator: String,
    pub range_band: String,
    pub sub_band: String,
    pub generation: String,
    pub municipality: String,
    pub uf: String,
}

/// Borrowed view of a single field, typed by its column kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Integer(Option<i64>),
    Float(Option<f64>),
    Text(&'a str),
}

impl StationRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn cell(&self, column: StationColumn) -> Cell<'_> {
        use StationColumn as C;
        match column {
            C::StationId => Cell::Integer(self.station_id),
            C::FreqTxMhz => Cell::Float(self.freq_tx_mhz),
            C::FreqRxMhz => Cell::Float(self.freq_rx_mhz),
            C::Latitude => Cell::Float(Some(self.latitude)),
            C::Longitude => Cell::Float(Some(self.longitude)),
            C::EmissionDesignation => Cell::Text(&self.emission_designation),
            C::Technology => Cell::Text(&self.technology),
            C::LatitudeText => Cell::Text(&self.latitude_text),
            C::LongitudeText => Cell::Text(&self.longitude_text),
            C::Address => Cell::Text(&self.address),
            C::Neighborhood => Cell::Text(&self.neighborhood),
            C::AddressNumber => Cell::Text(&self.address_number),
            C::AddressComplement => Cell::Text(&self.address_complement),
            C::PostalCode => Cell::Text(&self.postal_code),
            C::Operator => Cell::Text(&self.operator),
            C::RangeBand => Cell::Text(&self.range_band),
            C::SubBand => Cell::Text(&self.sub_band),
            C::Generation => Cell::Text(&self.generation),
            C::Municipality => Cell::Text(&self.municipality),
            C::Uf => Cell::Text(&self.uf),
        }
    }

    /// Text value of a categorical column, `None` for numeric columns.
    pub fn text(&self, column: StationColumn) -> Option<&str> {
        match self.cell(column) {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }
}

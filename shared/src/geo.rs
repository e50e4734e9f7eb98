//! Great-circle distances and the nearest-station scan.

use crate::smp::StationRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),
    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
    #[error("radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),
}

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeoError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

pub fn validate_radius(radius_km: f64) -> Result<f64, GeoError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(radius_km)
    } else {
        Err(GeoError::InvalidRadius(radius_km))
    }
}

/// Haversine distance in kilometers on a spherical earth.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStation {
    pub station: StationRecord,
    pub distance_km: f64,
}

/// Stations within `radius_km` of `origin`, closest first. Equal distances
/// keep their input order.
pub fn find_nearby<I>(
    origin: Coordinate,
    radius_km: f64,
    candidates: I,
) -> Result<Vec<NearbyStation>, GeoError>
where
    I: IntoIterator<Item = StationRecord>,
{
    origin.validate()?;
    validate_radius(radius_km)?;

    let mut nearby: Vec<NearbyStation> = candidates
        .into_iter()
        .filter_map(|station| {
            let distance_km = haversine_km(origin, station.coordinate());
            (distance_km <= radius_km).then_some(NearbyStation {
                station,
                distance_km,
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(nearby)
}

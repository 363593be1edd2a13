//! Great-circle distance and catchment-area lookups.

use thiserror::Error;

use crate::records::{find_by_name, Coordinates, StoreRecord};

/// Equatorial Earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatchmentError {
    #[error("store name not found: {0}")]
    StoreNotFound(String),

    #[error("no coordinates recorded for store: {0}")]
    MissingCoordinates(String),
}

/// Haversine distance between two points in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Clamp guards against h drifting a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Names of stores within `distance_km` of the store named `store_name`.
///
/// The source store is the first record with that name. Every record sharing
/// the name is left out of the result, as are records without coordinates.
/// Output keeps dataset order.
///
/// # Errors
///
/// - [`CatchmentError::StoreNotFound`] when no record has that name.
/// - [`CatchmentError::MissingCoordinates`] when the source store was never
///   geocoded.
pub fn catchment_area(
    records: &[StoreRecord],
    store_name: &str,
    distance_km: f64,
) -> Result<Vec<String>, CatchmentError> {
    let source = find_by_name(records, store_name)
        .ok_or_else(|| CatchmentError::StoreNotFound(store_name.to_string()))?;
    let origin = source
        .coordinates()
        .ok_or_else(|| CatchmentError::MissingCoordinates(store_name.to_string()))?;

    let names = records
        .iter()
        .filter(|other| other.name != store_name)
        .filter_map(|other| other.coordinates().map(|coords| (other, coords)))
        .filter(|(_, coords)| haversine_km(origin, *coords) <= distance_km)
        .map(|(other, _)| other.name.clone())
        .collect();

    Ok(names)
}

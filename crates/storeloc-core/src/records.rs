//! Scraped store records as persisted in the dataset file.

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair as returned by the geocoding service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub address: String,
    /// `null` in the dataset when geocoding gave up.
    pub coordinates: Option<Coordinates>,
    /// Operating-hours lines in document order.
    pub operating_hours: Vec<String>,
}

/// Outbound map links for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directions {
    pub gmap: String,
    pub waze: String,
}

/// One visible store entry captured during a scrape run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub name: String,
    pub info: StoreInfo,
    pub direction: Directions,
}

impl StoreRecord {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.info.coordinates
    }
}

/// Returns the first record named exactly `name`.
///
/// Names are not unique in a scrape; the first match wins.
#[must_use]
pub fn find_by_name<'a>(records: &'a [StoreRecord], name: &str) -> Option<&'a StoreRecord> {
    records.iter().find(|record| record.name == name)
}

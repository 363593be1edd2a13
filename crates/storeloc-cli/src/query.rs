//! One-off lookups against the geocoder and the dataset file.

use std::collections::HashMap;
use std::path::Path;

use storeloc_core::{catchment_area, load_database, AppConfig};
use storeloc_scraper::GeocodeClient;

/// # Errors
///
/// Returns an error if `GEOCODE_API_KEY` is missing or the HTTP client cannot
/// be built. A failed lookup prints `not found` and still succeeds.
pub(crate) async fn run_geocode(config: &AppConfig, address: &str) -> anyhow::Result<()> {
    let geocoder = GeocodeClient::with_endpoint(
        config.require_geocode_api_key()?,
        config.request_timeout_secs,
        &config.user_agent,
        &config.geocode_url,
    )?;

    match geocoder.geocode(address).await {
        Some(coords) => println!("{}, {}", coords.lat, coords.lng),
        None => println!("not found"),
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the dataset cannot be read, the store is unknown, or
/// the store has no coordinates.
pub(crate) fn run_catchment(
    config: &AppConfig,
    store_name: &str,
    distance_km: u32,
    database: Option<&Path>,
) -> anyhow::Result<()> {
    let path = database.unwrap_or(config.database_path.as_path());
    let records = load_database(path)?;
    let names = catchment_area(&records, store_name, f64::from(distance_km))?;

    let area = HashMap::from([(store_name, names)]);
    let body = serde_json::json!({ "catchment_area": area });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

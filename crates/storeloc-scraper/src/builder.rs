//! Database builder: one full scrape run.

use std::time::Duration;

use storeloc_core::{LocatorConfig, StoreRecord};

use crate::error::ScraperError;
use crate::extract::extract_record;
use crate::geocode::GeocodeClient;
use crate::locator::{search_visible_locations, SettleConfig};
use crate::webdriver::{Session, WebDriverClient};

/// Implicit element wait applied to every session.
const IMPLICIT_WAIT: Duration = Duration::from_secs(10);

/// Scrape the locator page described by `config` into store records.
///
/// Opens a browser session, runs the location search, and extracts every
/// visible result in page order. Items outside the search area are dropped.
/// Items that fail extraction (for example a missing map link) are logged
/// and skipped. The session is closed whether or not the run succeeds.
///
/// # Errors
///
/// Returns [`ScraperError::WebDriver`] if the session cannot be started or
/// the page-level search fails.
pub async fn build_database(
    driver: &WebDriverClient,
    geocoder: &GeocodeClient,
    config: &LocatorConfig,
    settle: SettleConfig,
) -> Result<Vec<StoreRecord>, ScraperError> {
    let session = driver.new_session(IMPLICIT_WAIT).await?;
    let result = scrape_session(&session, geocoder, config, settle).await;

    if let Err(e) = session.quit().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }

    result
}

async fn scrape_session(
    session: &Session,
    geocoder: &GeocodeClient,
    config: &LocatorConfig,
    settle: SettleConfig,
) -> Result<Vec<StoreRecord>, ScraperError> {
    session.goto(&config.url).await?;
    tracing::info!(url = %config.url, location = %config.location, "loaded store locator");

    let items = search_visible_locations(session, config, settle).await?;
    tracing::info!(visible = items.len(), "collected visible result items");

    let mut records = Vec::with_capacity(items.len());
    let mut filtered_out = 0usize;
    let mut failed = 0usize;

    for (index, item) in items.iter().enumerate() {
        match extract_record(session, item, &config.selectors, geocoder).await {
            Ok(Some(record)) => {
                if record.coordinates().is_none() {
                    tracing::warn!(store = %record.name, "store kept without coordinates");
                }
                records.push(record);
            }
            Ok(None) => filtered_out += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(index, error = %e, "skipping result item");
            }
        }
    }

    tracing::info!(
        stores = records.len(),
        filtered_out,
        failed,
        "scrape run complete"
    );
    Ok(records)
}

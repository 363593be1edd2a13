//! `scrape` command: drive the browser through the locator page and write
//! the dataset file.

use std::path::PathBuf;

use anyhow::Context;
use storeloc_core::{load_locator_config, save_database, AppConfig, LocatorConfig};
use storeloc_scraper::{build_database, GeocodeClient, SettleConfig, WebDriverClient};

/// Apply command-line overrides on top of the locator file.
pub(crate) fn apply_overrides(
    mut locator: LocatorConfig,
    url: Option<String>,
    location: Option<String>,
) -> anyhow::Result<LocatorConfig> {
    if let Some(url) = url {
        locator.url = url;
    }
    if let Some(location) = location {
        locator.location = location;
    }
    locator.validate()?;
    Ok(locator)
}

/// # Errors
///
/// Returns an error if config is incomplete, the browser session cannot be
/// driven through the search, or the dataset cannot be written.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    url: Option<String>,
    location: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let locator = load_locator_config(&config.locator_path)
        .with_context(|| format!("loading {}", config.locator_path.display()))?;
    let locator = apply_overrides(locator, url, location)?;
    let output = output.unwrap_or_else(|| config.database_path.clone());

    let geocoder = GeocodeClient::with_endpoint(
        config.require_geocode_api_key()?,
        config.request_timeout_secs,
        &config.user_agent,
        &config.geocode_url,
    )?;
    let driver = WebDriverClient::new(&config.webdriver_url, config.request_timeout_secs)?;
    let settle = SettleConfig::from_millis(config.settle_poll_ms, config.settle_timeout_ms);

    tracing::info!(
        url = %locator.url,
        location = %locator.location,
        webdriver = %config.webdriver_url,
        "starting scrape"
    );
    let records = build_database(&driver, &geocoder, &locator, settle).await?;

    save_database(&output, &records)?;
    let geocoded = records.iter().filter(|r| r.coordinates().is_some()).count();
    tracing::info!(
        stores = records.len(),
        geocoded,
        path = %output.display(),
        "dataset written"
    );
    println!("wrote {} stores to {}", records.len(), output.display());
    Ok(())
}

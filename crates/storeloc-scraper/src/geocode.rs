//! Geocoding adapter.
//!
//! Resolves a free-text store address to coordinates. When the service finds
//! nothing, the leading comma-delimited segment (usually a unit or floor
//! number such as `G-52`) is dropped and the lookup is retried once. All
//! failures collapse to `None`; the scraper keeps the store with absent
//! coordinates.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use storeloc_core::Coordinates;

use crate::error::ScraperError;

const ZERO_RESULTS: &str = "ZERO_RESULTS";
/// First lookup plus one retry with the leading segment stripped.
const MAX_ATTEMPTS: usize = 2;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

pub struct GeocodeClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GeocodeClient {
    /// Creates a client against `endpoint`, normally
    /// [`DEFAULT_GEOCODE_URL`](storeloc_core::config::DEFAULT_GEOCODE_URL).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be built
    /// or [`ScraperError::InvalidEndpoint`] if `endpoint` does not parse.
    pub fn with_endpoint(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        endpoint: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let endpoint = Url::parse(endpoint).map_err(|e| ScraperError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Look up `address`, retrying once without its leading segment when
    /// the service reports `ZERO_RESULTS`.
    ///
    /// Returns the first result's location, or `None` when the address
    /// cannot be resolved or the service misbehaves.
    pub async fn geocode(&self, address: &str) -> Option<Coordinates> {
        let mut query = address.trim().to_owned();

        for attempt in 1..=MAX_ATTEMPTS {
            let response = match self.lookup(&query).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(address = %query, error = %e, "geocode request failed");
                    return None;
                }
            };

            if response.status == ZERO_RESULTS {
                match strip_leading_segment(&query) {
                    Some(rest) if attempt < MAX_ATTEMPTS => {
                        tracing::debug!(from = %query, to = %rest, "geocode retry without leading segment");
                        query = rest;
                        continue;
                    }
                    _ => {
                        tracing::warn!(address, "geocode found no results");
                        return None;
                    }
                }
            }

            let location = response.results.first().map(|r| r.geometry.location);
            if location.is_none() {
                tracing::warn!(address, status = %response.status, "geocode returned no usable result");
            }
            return location;
        }

        None
    }

    async fn lookup(&self, address: &str) -> Result<GeocodeResponse, ScraperError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("geocode response for \"{address}\""),
            source: e,
        })
    }
}

/// Drops everything up to and including the first comma.
///
/// Returns `None` when there is no comma or nothing is left afterwards.
fn strip_leading_segment(address: &str) -> Option<String> {
    let (_, rest) = address.split_once(',')?;
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_leading_segment_drops_unit_number() {
        assert_eq!(
            strip_leading_segment("G-52, Wangsa Walk Mall, Kuala Lumpur, 53300").as_deref(),
            Some("Wangsa Walk Mall, Kuala Lumpur, 53300")
        );
    }

    #[test]
    fn strip_leading_segment_without_comma_is_none() {
        assert_eq!(strip_leading_segment("Kuala Lumpur"), None);
    }

    #[test]
    fn strip_leading_segment_with_trailing_comma_is_none() {
        assert_eq!(strip_leading_segment("Lot 5,  "), None);
    }

    #[test]
    fn response_tolerates_missing_results() {
        let parsed: GeocodeResponse =
            serde_json::from_str(r#"{"status": "REQUEST_DENIED"}"#).expect("parse");
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn with_endpoint_rejects_invalid_url() {
        let result = GeocodeClient::with_endpoint("k", 5, "ua", "::nope::");
        assert!(matches!(result, Err(ScraperError::InvalidEndpoint { .. })));
    }
}

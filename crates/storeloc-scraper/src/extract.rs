//! Record extractor: turn one result item into a [`StoreRecord`].

use storeloc_core::{Coordinates, Directions, Selectors, StoreInfo, StoreRecord};

use crate::error::ScraperError;
use crate::geocode::GeocodeClient;
use crate::webdriver::{ElementRef, Session};

/// A result item's fields before geocoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    pub name: String,
    pub address: String,
    pub operating_hours: Vec<String>,
    pub direction: Directions,
}

impl PendingRecord {
    #[must_use]
    pub fn into_record(self, coordinates: Option<Coordinates>) -> StoreRecord {
        StoreRecord {
            name: self.name,
            info: StoreInfo {
                address: self.address,
                coordinates,
                operating_hours: self.operating_hours,
            },
            direction: self.direction,
        }
    }
}

/// Splits info paragraphs into address and hours, dropping empty ones.
///
/// Returns `None` when nothing is left: the locator blanks the info block of
/// stores outside the searched area.
fn split_info(fragments: Vec<String>) -> Option<(String, Vec<String>)> {
    let mut kept = fragments
        .into_iter()
        .map(|f| f.trim().to_owned())
        .filter(|f| !f.is_empty());
    let address = kept.next()?;
    Some((address, kept.collect()))
}

fn directions_from_links(
    store: &str,
    links: &[Option<String>],
) -> Result<Directions, ScraperError> {
    let present: Vec<&str> = links.iter().take(2).flatten().map(String::as_str).collect();
    match present.as_slice() {
        [gmap, waze] => Ok(Directions {
            gmap: (*gmap).to_owned(),
            waze: (*waze).to_owned(),
        }),
        _ => Err(ScraperError::MissingDirection {
            store: store.to_owned(),
            found: present.len(),
        }),
    }
}

/// Read name, info and direction links from one result item.
///
/// Returns `Ok(None)` for items with no info text (filtered out of the search
/// radius). Direction links are only read for items that survive that check.
///
/// # Errors
///
/// - [`ScraperError::WebDriver`] if the name element is missing or a driver
///   command fails.
/// - [`ScraperError::MissingDirection`] if the item lacks either map link.
pub async fn read_pending_record(
    session: &Session,
    item: &ElementRef,
    selectors: &Selectors,
) -> Result<Option<PendingRecord>, ScraperError> {
    let name_el = session.find_in(item, &selectors.name).await?;
    let name = session.text(&name_el).await?.trim().to_owned();

    let mut fragments = Vec::new();
    for paragraph in session.find_all_in(item, &selectors.info).await? {
        fragments.push(session.text(&paragraph).await?);
    }

    let Some((address, operating_hours)) = split_info(fragments) else {
        tracing::debug!(store = %name, "skipping store without info (outside search area)");
        return Ok(None);
    };

    let mut links = Vec::with_capacity(2);
    for anchor in session
        .find_all_in(item, &selectors.direction)
        .await?
        .iter()
        .take(2)
    {
        links.push(session.attribute(anchor, "href").await?);
    }
    let direction = directions_from_links(&name, &links)?;

    Ok(Some(PendingRecord {
        name,
        address,
        operating_hours,
        direction,
    }))
}

/// [`read_pending_record`] followed by geocoding the address.
///
/// # Errors
///
/// Same as [`read_pending_record`]; geocoding failures only leave the
/// coordinates empty.
pub async fn extract_record(
    session: &Session,
    item: &ElementRef,
    selectors: &Selectors,
    geocoder: &GeocodeClient,
) -> Result<Option<StoreRecord>, ScraperError> {
    let Some(pending) = read_pending_record(session, item, selectors).await? else {
        return Ok(None);
    };
    let coordinates = geocoder.geocode(&pending.address).await;
    Ok(Some(pending.into_record(coordinates)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn split_info_takes_first_fragment_as_address() {
        let (address, hours) = split_info(strings(&[
            "G-52, Wangsa Walk Mall, Kuala Lumpur",
            "",
            "Mon - Sun",
            "8:00 AM - 10:00 PM",
        ]))
        .expect("info present");
        assert_eq!(address, "G-52, Wangsa Walk Mall, Kuala Lumpur");
        assert_eq!(hours, strings(&["Mon - Sun", "8:00 AM - 10:00 PM"]));
    }

    #[test]
    fn split_info_with_only_empty_fragments_filters_item_out() {
        assert!(split_info(strings(&["", "  ", ""])).is_none());
        assert!(split_info(Vec::new()).is_none());
    }

    #[test]
    fn directions_take_first_two_links() {
        let links = vec![
            Some("https://maps.google.com/?daddr=1".to_string()),
            Some("https://waze.com/ul?ll=1".to_string()),
            Some("https://example.com/extra".to_string()),
        ];
        let direction = directions_from_links("A", &links).expect("directions");
        assert_eq!(direction.gmap, "https://maps.google.com/?daddr=1");
        assert_eq!(direction.waze, "https://waze.com/ul?ll=1");
    }

    #[test]
    fn missing_second_link_is_an_error() {
        let links = vec![Some("https://maps.google.com/?daddr=1".to_string())];
        let err = directions_from_links("Subway A", &links).expect_err("one link only");
        assert!(
            matches!(err, ScraperError::MissingDirection { ref store, found: 1 } if store == "Subway A"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn link_without_href_is_an_error() {
        let links = vec![Some("https://maps.google.com".to_string()), None];
        let err = directions_from_links("B", &links).expect_err("href missing");
        assert!(matches!(err, ScraperError::MissingDirection { found: 1, .. }));
    }

    #[test]
    fn into_record_attaches_coordinates() {
        let pending = PendingRecord {
            name: "Subway KLCC".to_string(),
            address: "Suria KLCC, Kuala Lumpur".to_string(),
            operating_hours: strings(&["10:00 AM - 10:00 PM"]),
            direction: Directions {
                gmap: "g".to_string(),
                waze: "w".to_string(),
            },
        };
        let record = pending.into_record(Some(Coordinates::new(3.158, 101.712)));
        assert_eq!(record.name, "Subway KLCC");
        assert_eq!(record.coordinates(), Some(Coordinates::new(3.158, 101.712)));
        assert_eq!(record.info.operating_hours.len(), 1);
    }
}

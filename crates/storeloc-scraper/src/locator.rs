//! Page scraper: run a location search and collect the visible result items.

use std::time::Duration;

use storeloc_core::LocatorConfig;

use crate::error::WebDriverError;
use crate::webdriver::{ElementRef, Session, ENTER_KEY};

/// Consecutive identical counts required before the result list is
/// considered settled.
const STABLE_POLLS: usize = 3;

/// How long to wait for client-side filtering to settle after a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl SettleConfig {
    #[must_use]
    pub fn from_millis(poll_ms: u64, timeout_ms: u64) -> Self {
        Self {
            poll_interval: Duration::from_millis(poll_ms.max(1)),
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self::from_millis(500, 10_000)
    }
}

/// Tracks successive result counts until they stop changing.
#[derive(Debug, Default)]
struct SettleTracker {
    last: Option<usize>,
    streak: usize,
}

impl SettleTracker {
    /// Record one poll; returns `true` once the count has held steady for
    /// [`STABLE_POLLS`] polls in a row.
    fn observe(&mut self, count: usize) -> bool {
        if self.last == Some(count) {
            self.streak += 1;
        } else {
            self.last = Some(count);
            self.streak = 1;
        }
        self.streak >= STABLE_POLLS
    }
}

/// Type the configured location into the search box, submit, and return the
/// result items that are not hidden by an inline `display: none`.
///
/// # Errors
///
/// Returns [`WebDriverError`] if the search box or result container cannot
/// be found, or any driver command fails.
pub async fn search_visible_locations(
    session: &Session,
    config: &LocatorConfig,
    settle: SettleConfig,
) -> Result<Vec<ElementRef>, WebDriverError> {
    let selectors = &config.selectors;

    let search_bar = session.find(&selectors.search_bar).await?;
    session.send_keys(&search_bar, &config.location).await?;
    session.send_keys(&search_bar, ENTER_KEY).await?;
    tracing::debug!(location = %config.location, "submitted location search");

    let list = session.find(&selectors.location_list).await?;
    wait_for_settled_items(session, &list, &config.visible_items_selector(), settle).await
}

/// Poll the visible items under `list` until their count stops changing or
/// the settle timeout passes, then return the last poll's items.
async fn wait_for_settled_items(
    session: &Session,
    list: &ElementRef,
    selector: &str,
    settle: SettleConfig,
) -> Result<Vec<ElementRef>, WebDriverError> {
    let deadline = tokio::time::Instant::now() + settle.timeout;
    let mut tracker = SettleTracker::default();

    loop {
        tokio::time::sleep(settle.poll_interval).await;
        let items = session.find_all_in(list, selector).await?;

        if tracker.observe(items.len()) {
            tracing::debug!(count = items.len(), "result list settled");
            return Ok(items);
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(
                count = items.len(),
                timeout_ms = settle.timeout.as_millis(),
                "result list still changing at settle timeout; using last poll"
            );
            return Ok(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_settles_after_repeated_counts() {
        let mut tracker = SettleTracker::default();
        assert!(!tracker.observe(40));
        assert!(!tracker.observe(12));
        assert!(!tracker.observe(12));
        assert!(tracker.observe(12));
    }

    #[test]
    fn tracker_resets_on_change() {
        let mut tracker = SettleTracker::default();
        tracker.observe(5);
        tracker.observe(5);
        assert!(!tracker.observe(6));
        assert!(!tracker.observe(6));
        assert!(tracker.observe(6));
    }

    #[test]
    fn settle_config_never_has_zero_interval() {
        let settle = SettleConfig::from_millis(0, 100);
        assert_eq!(settle.poll_interval, Duration::from_millis(1));
        assert_eq!(settle.timeout, Duration::from_millis(100));
    }
}

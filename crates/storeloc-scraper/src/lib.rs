//! Store-locator scraping pipeline.
//!
//! Drives a headless browser over WebDriver to run a location search on the
//! locator page, extracts one [`StoreRecord`](storeloc_core::StoreRecord) per
//! visible result, and attaches coordinates from the geocoding service.

pub mod builder;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod locator;
pub mod webdriver;

pub use builder::build_database;
pub use error::{ScraperError, WebDriverError};
pub use geocode::GeocodeClient;
pub use locator::SettleConfig;
pub use webdriver::{ElementRef, Session, WebDriverClient};

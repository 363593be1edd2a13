//! Shared data model and configuration for storeloc.
//!
//! Holds the scraped [`StoreRecord`] shape, the dataset file format, the
//! locator YAML config, environment-driven [`AppConfig`], and the
//! great-circle helpers behind catchment-area queries.

pub mod app_config;
pub mod config;
pub mod database;
pub mod error;
pub mod geo;
pub mod locator;
pub mod records;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use database::{load_database, save_database};
pub use error::{ConfigError, DatabaseError};
pub use geo::{catchment_area, haversine_km, CatchmentError, EARTH_RADIUS_KM};
pub use locator::{load_locator_config, LocatorConfig, Selectors};
pub use records::{find_by_name, Coordinates, Directions, StoreInfo, StoreRecord};

//! Store-locator page description loaded from YAML.
//!
//! ```yaml
//! url: https://subway.com.my/find-a-subway
//! location: kuala lumpur
//! selectors:
//!   search_bar: "input#fp_searchAddress"
//!   location_list: "div.fp_ll_holder"
//!   result_items: "div.fp_listitem"
//!   name: "div.location_left > h4"
//!   info: "div.location_left > div.infoboxcontent > p"
//!   direction: "div.location_right > div.directionButton > a"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const DEFAULT_LOCATOR_URL: &str = "https://subway.com.my/find-a-subway";
pub const DEFAULT_SEARCH_LOCATION: &str = "kuala lumpur";

/// CSS selectors for the parts of the locator page the scraper touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectors {
    pub search_bar: String,
    pub location_list: String,
    pub result_items: String,
    /// Relative to a result item.
    pub name: String,
    /// Relative to a result item; matches address and hours paragraphs.
    pub info: String,
    /// Relative to a result item; first match is Google Maps, second is Waze.
    pub direction: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            search_bar: "input#fp_searchAddress".to_string(),
            location_list: "div.fp_ll_holder".to_string(),
            result_items: "div.fp_listitem".to_string(),
            name: "div.location_left > h4".to_string(),
            info: "div.location_left > div.infoboxcontent > p".to_string(),
            direction: "div.location_right > div.directionButton > a".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    pub url: String,
    /// Text typed into the search box before collecting results.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub selectors: Selectors,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LOCATOR_URL.to_string(),
            location: DEFAULT_SEARCH_LOCATION.to_string(),
            selectors: Selectors::default(),
        }
    }
}

impl LocatorConfig {
    /// Selector for result items that are not hidden by an inline
    /// `display: none` style.
    #[must_use]
    pub fn visible_items_selector(&self) -> String {
        format!("{}:not([style*=none])", self.selectors.result_items)
    }

    /// Check that the URL is http(s) and every selector is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "locator url must be http(s), got '{}'",
                self.url
            )));
        }

        let selectors = &self.selectors;
        let named = [
            ("search_bar", &selectors.search_bar),
            ("location_list", &selectors.location_list),
            ("result_items", &selectors.result_items),
            ("name", &selectors.name),
            ("info", &selectors.info),
            ("direction", &selectors.direction),
        ];
        for (field, value) in named {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "selector '{field}' must be non-empty"
                )));
            }
        }

        Ok(())
    }
}

/// Load and validate a locator config from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or has an empty
/// URL or selector.
pub fn load_locator_config(path: &Path) -> Result<LocatorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocatorFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_locator_config(&content)
}

fn parse_locator_config(content: &str) -> Result<LocatorConfig, ConfigError> {
    let config: LocatorConfig =
        serde_yaml::from_str(content).map_err(ConfigError::LocatorFileParse)?;
    config.validate()?;
    Ok(config)
}

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub database_path: PathBuf,
    pub locator_path: PathBuf,
    pub ask_model_path: PathBuf,
    pub api_secret: Option<String>,
    pub geocode_api_key: Option<String>,
    pub geocode_url: String,
    pub webdriver_url: String,
    pub intent_url: Option<String>,
    pub entity_url: Option<String>,
    pub request_timeout_secs: u64,
    pub settle_timeout_ms: u64,
    pub settle_poll_ms: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// The shared secret the query service compares `Authorization` against.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `STORELOC_API_SECRET` is
    /// unset or blank.
    pub fn require_api_secret(&self) -> Result<&str, ConfigError> {
        self.api_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("STORELOC_API_SECRET".to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `GEOCODE_API_KEY` is unset
    /// or blank.
    pub fn require_geocode_api_key(&self) -> Result<&str, ConfigError> {
        self.geocode_api_key
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GEOCODE_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_path", &self.database_path)
            .field("locator_path", &self.locator_path)
            .field("ask_model_path", &self.ask_model_path)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[redacted]"))
            .field(
                "geocode_api_key",
                &self.geocode_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocode_url", &self.geocode_url)
            .field("webdriver_url", &self.webdriver_url)
            .field("intent_url", &self.intent_url)
            .field("entity_url", &self.entity_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("settle_timeout_ms", &self.settle_timeout_ms)
            .field("settle_poll_ms", &self.settle_poll_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

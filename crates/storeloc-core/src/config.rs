use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Secrets are optional here; each binary asks for the ones it needs via
/// [`AppConfig::require_api_secret`] and [`AppConfig::require_geocode_api_key`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let bind_addr = parse_addr("STORELOC_BIND_ADDR", "127.0.0.1:5000")?;
    let log_level = or_default("STORELOC_LOG_LEVEL", "info");
    let database_path = PathBuf::from(or_default("STORELOC_DATABASE_PATH", "./data.json"));
    let locator_path = PathBuf::from(or_default(
        "STORELOC_LOCATOR_PATH",
        "./config/locator.yaml",
    ));
    let ask_model_path = PathBuf::from(or_default(
        "STORELOC_ASK_MODEL_PATH",
        "./config/ask_model.yaml",
    ));

    let api_secret = optional("STORELOC_API_SECRET");
    let geocode_api_key = optional("GEOCODE_API_KEY");
    let geocode_url = or_default("STORELOC_GEOCODE_URL", DEFAULT_GEOCODE_URL);
    let webdriver_url = or_default("STORELOC_WEBDRIVER_URL", "http://localhost:9515");
    let intent_url = optional("STORELOC_INTENT_URL");
    let entity_url = optional("STORELOC_ENTITY_URL");

    let request_timeout_secs = parse_u64("STORELOC_REQUEST_TIMEOUT_SECS", "30")?;
    let settle_timeout_ms = parse_u64("STORELOC_SETTLE_TIMEOUT_MS", "10000")?;
    let settle_poll_ms = parse_u64("STORELOC_SETTLE_POLL_MS", "500")?;
    if settle_poll_ms == 0 {
        return Err(invalid(
            "STORELOC_SETTLE_POLL_MS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("STORELOC_USER_AGENT", "storeloc/0.1 (store-locator)");

    Ok(AppConfig {
        bind_addr,
        log_level,
        database_path,
        locator_path,
        ask_model_path,
        api_secret,
        geocode_api_key,
        geocode_url,
        webdriver_url,
        intent_url,
        entity_url,
        request_timeout_secs,
        settle_timeout_ms,
        settle_poll_ms,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("browser error: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store \"{store}\" has {found} direction link(s); expected 2")]
    MissingDirection { store: String, found: usize },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Errors talking to a WebDriver server.
#[derive(Debug, Error)]
pub enum WebDriverError {
    /// Network or TLS failure reaching the driver.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The driver answered with a W3C error envelope, e.g. `no such element`.
    #[error("{command} failed: {error}: {message}")]
    Command {
        command: String,
        error: String,
        message: String,
    },

    /// The driver answered with a body that does not match the protocol.
    #[error("malformed response for {context}: {source}")]
    Protocol {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid WebDriver URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl WebDriverError {
    /// True for the W3C `no such element` error code.
    #[must_use]
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::Command { error, .. } if error == "no such element")
    }
}

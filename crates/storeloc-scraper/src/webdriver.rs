//! Minimal W3C WebDriver client.
//!
//! Covers the handful of commands the locator scraper needs: open a headless
//! Chrome session, navigate, find elements by CSS selector, type into an
//! input, read text and attributes, and close the session. Every response is
//! a `{"value": ...}` envelope; non-2xx responses carry
//! `{"value": {"error", "message"}}` and surface as
//! [`WebDriverError::Command`].

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::WebDriverError;

/// W3C key code for the Enter key, sent through `element/{id}/value`.
pub const ENTER_KEY: &str = "\u{E007}";

const CSS_SELECTOR: &str = "css selector";
const HEADLESS_CHROME_ARGS: [&str; 3] = ["--no-sandbox", "--headless", "--disable-gpu"];

/// Opaque handle to an element inside a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

impl ElementRef {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct NewSessionValue {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Entry point to a WebDriver server such as `chromedriver`.
pub struct WebDriverClient {
    client: Client,
    base_url: Url,
}

impl WebDriverClient {
    /// # Errors
    ///
    /// Returns [`WebDriverError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`WebDriverError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, WebDriverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // A trailing slash makes Url::join append "session/..." instead of
        // replacing the last path segment (e.g. "/wd/hub").
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| WebDriverError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Start a headless Chrome session with an implicit element wait.
    ///
    /// # Errors
    ///
    /// Returns [`WebDriverError`] if the driver refuses the session or the
    /// timeouts command fails.
    pub async fn new_session(&self, implicit_wait: Duration) -> Result<Session, WebDriverError> {
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": HEADLESS_CHROME_ARGS }
                }
            }
        });

        let url = join(&self.base_url, "session")?;
        let value = execute(
            &self.client,
            Method::POST,
            url,
            Some(capabilities),
            "new session",
        )
        .await?;
        let created: NewSessionValue = decode(value, "new session")?;

        let session_url = join(&self.base_url, &format!("session/{}/", created.session_id))?;
        let delete_url = join(&self.base_url, &format!("session/{}", created.session_id))?;
        let session = Session {
            client: self.client.clone(),
            id: created.session_id,
            session_url,
            delete_url,
        };
        tracing::debug!(session_id = %session.id, "webdriver session started");

        session.set_implicit_wait(implicit_wait).await?;
        Ok(session)
    }
}

/// A live browser session. Call [`Session::quit`] to release the browser.
pub struct Session {
    client: Client,
    id: String,
    /// Slash-terminated so commands join beneath it.
    session_url: Url,
    /// `DELETE` target; the W3C route has no trailing slash.
    delete_url: Url,
}

impl Session {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// # Errors
    ///
    /// Returns [`WebDriverError`] if the driver rejects the timeouts.
    pub async fn set_implicit_wait(&self, wait: Duration) -> Result<(), WebDriverError> {
        let millis = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        self.command(
            Method::POST,
            "timeouts",
            Some(json!({ "implicit": millis })),
            "set timeouts",
        )
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`WebDriverError`] if navigation fails.
    pub async fn goto(&self, url: &str) -> Result<(), WebDriverError> {
        self.command(Method::POST, "url", Some(json!({ "url": url })), "navigate")
            .await?;
        Ok(())
    }

    /// Find the first element in the document matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns a `no such element` [`WebDriverError::Command`] when nothing
    /// matches within the implicit wait.
    pub async fn find(&self, selector: &str) -> Result<ElementRef, WebDriverError> {
        let value = self
            .command(Method::POST, "element", Some(by_css(selector)), "find element")
            .await?;
        decode(value, "find element")
    }

    /// Find the first descendant of `parent` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns a `no such element` [`WebDriverError::Command`] when nothing
    /// matches.
    pub async fn find_in(
        &self,
        parent: &ElementRef,
        selector: &str,
    ) -> Result<ElementRef, WebDriverError> {
        let path = format!("element/{}/element", parent.id);
        let value = self
            .command(Method::POST, &path, Some(by_css(selector)), "find child element")
            .await?;
        decode(value, "find child element")
    }

    /// Find every descendant of `parent` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`WebDriverError`] on driver or protocol failure.
    pub async fn find_all_in(
        &self,
        parent: &ElementRef,
        selector: &str,
    ) -> Result<Vec<ElementRef>, WebDriverError> {
        let path = format!("element/{}/elements", parent.id);
        let value = self
            .command(
                Method::POST,
                &path,
                Some(by_css(selector)),
                "find child elements",
            )
            .await?;
        decode(value, "find child elements")
    }

    /// Type `text` into `element`. Use [`ENTER_KEY`] to submit.
    ///
    /// # Errors
    ///
    /// Returns [`WebDriverError`] if the element is not interactable.
    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        let path = format!("element/{}/value", element.id);
        self.command(Method::POST, &path, Some(json!({ "text": text })), "send keys")
            .await?;
        Ok(())
    }

    /// Rendered text of `element`.
    ///
    /// # Errors
    ///
    /// Returns [`WebDriverError`] on driver or protocol failure.
    pub async fn text(&self, element: &ElementRef) -> Result<String, WebDriverError> {
        let path = format!("element/{}/text", element.id);
        let value = self
            .command(Method::GET, &path, None, "get element text")
            .await?;
        decode(value, "get element text")
    }

    /// Attribute `name` of `element`, or `None` when it is not set.
    ///
    /// # Errors
    ///
    /// Returns [`WebDriverError`] on driver or protocol failure.
    pub async fn attribute(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        let path = format!("element/{}/attribute/{name}", element.id);
        let value = self
            .command(Method::GET, &path, None, "get element attribute")
            .await?;
        decode(value, "get element attribute")
    }

    /// Close the session and the browser behind it.
    ///
    /// # Errors
    ///
    /// Returns [`WebDriverError`] if the driver fails to delete the session.
    pub async fn quit(self) -> Result<(), WebDriverError> {
        let url = self.delete_url.clone();
        execute(&self.client, Method::DELETE, url, None, "delete session").await?;
        tracing::debug!(session_id = %self.id, "webdriver session closed");
        Ok(())
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        command: &str,
    ) -> Result<Value, WebDriverError> {
        let url = join(&self.session_url, path)?;
        execute(&self.client, method, url, body, command).await
    }
}

fn by_css(selector: &str) -> Value {
    json!({ "using": CSS_SELECTOR, "value": selector })
}

fn join(base: &Url, path: &str) -> Result<Url, WebDriverError> {
    base.join(path).map_err(|e| WebDriverError::InvalidUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(value: Value, context: &str) -> Result<T, WebDriverError> {
    serde_json::from_value(value).map_err(|e| WebDriverError::Protocol {
        context: context.to_string(),
        source: e,
    })
}

async fn execute(
    client: &Client,
    method: Method,
    url: Url,
    body: Option<Value>,
    command: &str,
) -> Result<Value, WebDriverError> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    let envelope: Envelope = serde_json::from_str(&text).map_err(|e| WebDriverError::Protocol {
        context: command.to_string(),
        source: e,
    })?;

    if !status.is_success() {
        let wire: WireError = decode(envelope.value, command)?;
        return Err(WebDriverError::Command {
            command: command.to_string(),
            error: wire.error,
            message: wire.message,
        });
    }

    Ok(envelope.value)
}

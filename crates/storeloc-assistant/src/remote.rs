//! HTTP client for hosted text-classification and token-classification
//! models (Hugging Face inference style).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entities::Entity;
use crate::error::AssistantError;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Text classification responses come either flat or nested one level
/// (one list per input).
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Deserialize)]
struct TokenSpan {
    #[serde(alias = "entity")]
    entity_group: String,
    word: String,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

/// Un-aggregated token output tags spans `B-GPE` / `I-GPE`; keep the
/// entity type only.
fn strip_bio_prefix(label: String) -> String {
    match label.split_once('-') {
        Some(("B" | "I", rest)) => rest.to_owned(),
        _ => label,
    }
}

/// One hosted model endpoint.
pub struct InferenceClient {
    client: reqwest::Client,
    url: String,
}

impl InferenceClient {
    /// # Errors
    ///
    /// Returns [`AssistantError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// Highest-scoring label for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Inference`] on a non-2xx status, an
    /// unparseable body, or an empty label list.
    pub(crate) async fn top_label(&self, text: &str) -> Result<LabelScore, AssistantError> {
        let body: ClassificationResponse = self.post(text).await?;
        let scores = match body {
            ClassificationResponse::Nested(lists) => lists.into_iter().next().unwrap_or_default(),
            ClassificationResponse::Flat(list) => list,
        };

        scores
            .into_iter()
            .reduce(|best, next| if next.score > best.score { next } else { best })
            .ok_or_else(|| AssistantError::Inference("classifier returned no labels".to_string()))
    }

    /// Entity spans for `text`, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Inference`] on a non-2xx status or an
    /// unparseable body.
    pub(crate) async fn entities(&self, text: &str) -> Result<Vec<Entity>, AssistantError> {
        let spans: Vec<TokenSpan> = self.post(text).await?;
        let mut entities: Vec<Entity> = spans
            .into_iter()
            .map(|span| {
                let start = span.start.unwrap_or(0);
                let end = span.end.unwrap_or(start + span.word.len());
                Entity {
                    text: span.word.trim().to_owned(),
                    label: strip_bio_prefix(span.entity_group),
                    start,
                    end,
                }
            })
            .filter(|e| !e.text.is_empty())
            .collect();
        entities.sort_by_key(|e| e.start);
        Ok(entities)
    }

    async fn post<T: serde::de::DeserializeOwned>(&self, text: &str) -> Result<T, AssistantError> {
        let response = self
            .client
            .post(&self.url)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(|e| AssistantError::Inference(format!("request to {} failed: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(AssistantError::Inference(format!(
                "{} returned status {}",
                self.url,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AssistantError::Inference(format!("response parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bio_prefix_is_dropped_from_token_labels() {
        assert_eq!(strip_bio_prefix("B-GPE".to_string()), "GPE");
        assert_eq!(strip_bio_prefix("I-LOC".to_string()), "LOC");
        assert_eq!(strip_bio_prefix("GPE".to_string()), "GPE");
        assert_eq!(strip_bio_prefix("WORK-OF-ART".to_string()), "WORK-OF-ART");
    }
}

//! Named-entity recognition for place names.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::AssistantError;
use crate::model::AskModelFile;
use crate::remote::InferenceClient;

/// Labels treated as geopolitical mentions by the count answer.
pub const PLACE_LABELS: [&str; 2] = ["GPE", "LOC"];

/// One recognised span in the question. `start`/`end` are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    #[must_use]
    pub fn is_place(&self) -> bool {
        PLACE_LABELS
            .iter()
            .any(|label| self.label.eq_ignore_ascii_case(label))
    }
}

/// Dictionary matcher built from the `entities` section of the model file.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    terms: Vec<(String, Regex)>,
}

impl Gazetteer {
    /// # Errors
    ///
    /// Returns [`AssistantError::Validation`] if a term cannot be turned
    /// into a matcher.
    pub fn from_model(model: &AskModelFile) -> Result<Self, AssistantError> {
        let mut terms = Vec::new();
        for group in &model.entities {
            for term in group.terms.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
                let pattern = format!(r"\b{}\b", regex::escape(term));
                let matcher = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        AssistantError::Validation(format!("bad entity term '{term}': {e}"))
                    })?;
                terms.push((group.label.clone(), matcher));
            }
        }
        Ok(Self { terms })
    }

    /// Every term occurrence in `text`, ordered by position.
    ///
    /// Where matches overlap the longer one wins, so "Kuala Lumpur City"
    /// is not also reported as "Kuala Lumpur".
    #[must_use]
    pub fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut found: Vec<Entity> = self
            .terms
            .iter()
            .flat_map(|(label, matcher)| {
                matcher.find_iter(text).map(move |m| Entity {
                    text: m.as_str().to_owned(),
                    label: label.clone(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect();

        found.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then((b.end - b.start).cmp(&(a.end - a.start)))
        });

        let mut kept: Vec<Entity> = Vec::with_capacity(found.len());
        for entity in found {
            if kept.last().is_none_or(|prev| entity.start >= prev.end) {
                kept.push(entity);
            }
        }
        kept
    }
}

/// Entity model handle shared across requests.
pub enum EntityRecognizer {
    Gazetteer(Gazetteer),
    Remote(InferenceClient),
}

impl EntityRecognizer {
    /// Entities in `question`. Remote failures are logged and yield none.
    pub async fn recognize(&self, question: &str) -> Vec<Entity> {
        match self {
            Self::Gazetteer(gazetteer) => gazetteer.recognize(question),
            Self::Remote(client) => client.entities(question).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "entity recognition failed");
                Vec::new()
            }),
        }
    }
}

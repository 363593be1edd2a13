use storeloc_core::{AppConfig, StoreRecord};

use crate::entities::{Entity, EntityRecognizer, Gazetteer};
use crate::error::AssistantError;
use crate::hours::{earliest_opening, latest_closing};
use crate::intent::{IntentClassifier, PatternIntentModel};
use crate::model::load_ask_model;
use crate::remote::InferenceClient;

pub const NEED_LOCATION: &str = "Please tell me which location you are asking about.";
pub const NO_HOURS: &str = "No operating hours are available.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I do not understand your question.";

/// Place-name shorthands and the address text they stand for.
const PLACE_ALIASES: [(&str, &str); 1] = [("KL", "Kuala Lumpur")];

/// Intents with a canned answer. Every other label is [`Intent::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CountStores,
    OperatingEarliest,
    OperatingLatest,
    Other(String),
}

impl Intent {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "count_stores" => Self::CountStores,
            "operating_earliest" => Self::OperatingEarliest,
            "operating_latest" => Self::OperatingLatest,
            other => Self::Other(other.to_owned()),
        }
    }
}

fn address_term(mention: &str) -> &str {
    PLACE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(mention))
        .map_or(mention, |(_, expanded)| expanded)
}

/// Number of stores whose address mentions `place`, case-insensitively.
/// Aliases such as `KL` are expanded first.
#[must_use]
pub fn count_stores_in(records: &[StoreRecord], place: &str) -> usize {
    let needle = address_term(place).to_lowercase();
    records
        .iter()
        .filter(|record| record.info.address.to_lowercase().contains(&needle))
        .count()
}

/// Render the answer for an already-classified question.
///
/// `location` is the caller-supplied fallback for count questions that name
/// no place.
#[must_use]
pub fn answer_question(
    intent: &Intent,
    entities: &[Entity],
    location: Option<&str>,
    records: &[StoreRecord],
) -> String {
    match intent {
        Intent::CountStores => {
            let mention = entities
                .iter()
                .find(|e| e.is_place())
                .map(|e| e.text.as_str())
                .or_else(|| location.map(str::trim).filter(|l| !l.is_empty()));
            match mention {
                Some(place) => {
                    let n = count_stores_in(records, place);
                    format!("There are {n} stores in {place}.")
                }
                None => NEED_LOCATION.to_string(),
            }
        }
        Intent::OperatingEarliest => match earliest_opening(records) {
            Some((store, time)) => format!(
                "The earliest opening store is {}, opening at {}.",
                store.name, time.text
            ),
            None => NO_HOURS.to_string(),
        },
        Intent::OperatingLatest => match latest_closing(records) {
            Some((store, time)) => format!(
                "The latest closing store is {}, closing at {}.",
                store.name, time.text
            ),
            None => NO_HOURS.to_string(),
        },
        Intent::Other(_) => NOT_UNDERSTOOD.to_string(),
    }
}

/// Intent and entity models, loaded once and shared by every request.
pub struct Assistant {
    intents: IntentClassifier,
    entities: EntityRecognizer,
}

impl Assistant {
    #[must_use]
    pub fn new(intents: IntentClassifier, entities: EntityRecognizer) -> Self {
        Self { intents, entities }
    }

    /// Models per the app config: a remote endpoint where its URL is set,
    /// otherwise the local model file. The file is only read when at least
    /// one side needs it.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError`] if the model file cannot be loaded or an
    /// HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AssistantError> {
        let timeout = config.request_timeout_secs;
        let mut model = None;

        let intents = match &config.intent_url {
            Some(url) => IntentClassifier::Remote(InferenceClient::new(url, timeout)?),
            None => {
                let local = model.insert(load_ask_model(&config.ask_model_path)?);
                IntentClassifier::Patterns(PatternIntentModel::from_model(local))
            }
        };
        let entities = match &config.entity_url {
            Some(url) => EntityRecognizer::Remote(InferenceClient::new(url, timeout)?),
            None => {
                let local = match model.take() {
                    Some(local) => local,
                    None => load_ask_model(&config.ask_model_path)?,
                };
                EntityRecognizer::Gazetteer(Gazetteer::from_model(&local)?)
            }
        };

        tracing::info!(
            intent_backend = if config.intent_url.is_some() { "remote" } else { "patterns" },
            entity_backend = if config.entity_url.is_some() { "remote" } else { "gazetteer" },
            "assistant models loaded"
        );
        Ok(Self::new(intents, entities))
    }

    /// Classify `question`, recognise its entities, and render the answer.
    pub async fn answer(
        &self,
        records: &[StoreRecord],
        question: &str,
        location: Option<&str>,
    ) -> String {
        let label = self.intents.classify(question).await;
        let intent = Intent::from_label(&label);
        let entities = if intent == Intent::CountStores {
            self.entities.recognize(question).await
        } else {
            Vec::new()
        };
        tracing::debug!(%label, entities = entities.len(), "question classified");
        answer_question(&intent, &entities, location, records)
    }
}

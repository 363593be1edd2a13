//! Canned question answering over the scraped store list.
//!
//! A question is classified into an intent label, scanned for place-name
//! entities, and dispatched to one of a few fixed answer templates (store
//! count per area, earliest opening, latest closing). The intent and entity
//! models are loaded once and shared read-only; they are either small YAML
//! pattern models or remote inference endpoints.

pub mod answer;
pub mod entities;
pub mod error;
pub mod hours;
pub mod intent;
pub mod model;
pub mod remote;

pub use answer::{answer_question, Assistant, Intent};
pub use entities::{Entity, EntityRecognizer, Gazetteer};
pub use error::AssistantError;
pub use intent::{IntentClassifier, PatternIntentModel};
pub use model::{load_ask_model, parse_ask_model, AskModelFile};
pub use remote::InferenceClient;

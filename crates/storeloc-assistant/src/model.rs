//! YAML model file shared by the pattern intent model and the gazetteer.
//!
//! ```yaml
//! threshold: 0.2
//! intents:
//!   - tag: count_stores
//!     patterns:
//!       - how many stores are in KL
//! entities:
//!   - label: GPE
//!     terms: [KL, Kuala Lumpur]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::AssistantError;

fn default_threshold() -> f64 {
    0.2
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntentSpec {
    pub tag: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpec {
    pub label: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskModelFile {
    /// Minimum pattern similarity for a question to get a label at all.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub intents: Vec<IntentSpec>,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

/// Load and validate the ask model file.
///
/// # Errors
///
/// Returns [`AssistantError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_ask_model(path: &Path) -> Result<AskModelFile, AssistantError> {
    let content = std::fs::read_to_string(path).map_err(|e| AssistantError::ModelFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_ask_model(&content)
}

/// Parse and validate ask model YAML.
///
/// # Errors
///
/// Returns [`AssistantError`] if the YAML is malformed or fails validation.
pub fn parse_ask_model(content: &str) -> Result<AskModelFile, AssistantError> {
    let model: AskModelFile = serde_yaml::from_str(content)?;
    validate(&model)?;
    Ok(model)
}

fn validate(model: &AskModelFile) -> Result<(), AssistantError> {
    if model.intents.is_empty() {
        return Err(AssistantError::Validation(
            "model must define at least one intent".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&model.threshold) {
        return Err(AssistantError::Validation(format!(
            "threshold {} must be within 0.0..=1.0",
            model.threshold
        )));
    }

    let mut seen = HashSet::new();
    for intent in &model.intents {
        if intent.tag.trim().is_empty() {
            return Err(AssistantError::Validation(
                "intent tag must be non-empty".to_string(),
            ));
        }
        if !seen.insert(intent.tag.as_str()) {
            return Err(AssistantError::Validation(format!(
                "duplicate intent tag: '{}'",
                intent.tag
            )));
        }
        if intent.patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(AssistantError::Validation(format!(
                "intent '{}' has no patterns",
                intent.tag
            )));
        }
    }

    for entity in &model.entities {
        if entity.label.trim().is_empty() {
            return Err(AssistantError::Validation(
                "entity label must be non-empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_model_with_default_threshold() {
        let model = parse_ask_model(
            "intents:\n  - tag: count_stores\n    patterns: [how many stores]\n",
        )
        .expect("parse");
        assert!((model.threshold - 0.2).abs() < f64::EPSILON);
        assert_eq!(model.intents[0].tag, "count_stores");
        assert!(model.entities.is_empty());
    }

    #[test]
    fn rejects_empty_intents() {
        let result = parse_ask_model("intents: []\n");
        assert!(matches!(result, Err(AssistantError::Validation(_))));
    }

    #[test]
    fn rejects_duplicate_tags() {
        let yaml = r"
intents:
  - tag: greeting
    patterns: [hello]
  - tag: greeting
    patterns: [hi]
";
        let result = parse_ask_model(yaml);
        assert!(
            matches!(result, Err(AssistantError::Validation(ref msg)) if msg.contains("duplicate")),
            "got: {result:?}"
        );
    }

    #[test]
    fn rejects_intent_without_patterns() {
        let yaml = "intents:\n  - tag: empty\n    patterns: ['  ']\n";
        assert!(matches!(
            parse_ask_model(yaml),
            Err(AssistantError::Validation(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let yaml = "threshold: 1.5\nintents:\n  - tag: a\n    patterns: [x]\n";
        assert!(matches!(
            parse_ask_model(yaml),
            Err(AssistantError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_ask_model(Path::new("/nonexistent/ask_model.yaml"));
        assert!(matches!(result, Err(AssistantError::ModelFileIo { .. })));
    }
}

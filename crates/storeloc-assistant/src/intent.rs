//! Intent classification.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::AskModelFile;
use crate::remote::InferenceClient;

/// Label returned when no intent clears the threshold or the remote model
/// is unreachable.
pub const UNKNOWN_INTENT: &str = "unknown";

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("valid regex"));

pub(crate) fn tokens(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_owned())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let score = a.intersection(b).count() as f64 / union as f64;
    score
}

/// Nearest-pattern classifier over the intents in the model file.
#[derive(Debug, Clone)]
pub struct PatternIntentModel {
    threshold: f64,
    intents: Vec<(String, Vec<HashSet<String>>)>,
}

impl PatternIntentModel {
    #[must_use]
    pub fn from_model(model: &AskModelFile) -> Self {
        let intents = model
            .intents
            .iter()
            .map(|intent| {
                let patterns = intent
                    .patterns
                    .iter()
                    .map(|p| tokens(p))
                    .filter(|t| !t.is_empty())
                    .collect();
                (intent.tag.clone(), patterns)
            })
            .collect();

        Self {
            threshold: model.threshold,
            intents,
        }
    }

    /// Tag of the pattern with the highest word overlap with `question`.
    ///
    /// Ties go to the intent listed first. Scores below the threshold yield
    /// [`UNKNOWN_INTENT`].
    #[must_use]
    pub fn classify(&self, question: &str) -> &str {
        let words = tokens(question);
        if words.is_empty() {
            return UNKNOWN_INTENT;
        }

        let mut best: Option<(&str, f64)> = None;
        for (tag, patterns) in &self.intents {
            for pattern in patterns {
                let score = jaccard(&words, pattern);
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((tag.as_str(), score));
                }
            }
        }

        match best {
            Some((tag, score)) if score >= self.threshold && score > 0.0 => tag,
            _ => UNKNOWN_INTENT,
        }
    }
}

/// Intent model handle shared across requests.
pub enum IntentClassifier {
    Patterns(PatternIntentModel),
    Remote(InferenceClient),
}

impl IntentClassifier {
    /// Intent label for `question`. Never fails: remote errors are logged and
    /// reported as [`UNKNOWN_INTENT`].
    pub async fn classify(&self, question: &str) -> String {
        match self {
            Self::Patterns(model) => model.classify(question).to_owned(),
            Self::Remote(client) => match client.top_label(question).await {
                Ok(top) => top.label,
                Err(e) => {
                    tracing::warn!(error = %e, "intent classification failed");
                    UNKNOWN_INTENT.to_owned()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_ask_model;

    fn model() -> PatternIntentModel {
        let yaml = r"
threshold: 0.2
intents:
  - tag: count_stores
    patterns:
      - how many stores are there in kl
      - number of outlets in kuala lumpur
  - tag: operating_earliest
    patterns:
      - which store opens the earliest
      - what is the earliest opening time
  - tag: operating_latest
    patterns:
      - which store closes the latest
      - which outlet is open the latest
";
        PatternIntentModel::from_model(&parse_ask_model(yaml).expect("model"))
    }

    #[test]
    fn tokens_lowercase_and_split_punctuation() {
        let words = tokens("How many stores in KL?");
        assert!(words.contains("kl"));
        assert!(words.contains("how"));
        assert!(!words.contains("kl?"));
    }

    #[test]
    fn classifies_count_question() {
        assert_eq!(model().classify("How many stores are in KL?"), "count_stores");
    }

    #[test]
    fn classifies_earliest_and_latest() {
        let model = model();
        assert_eq!(
            model.classify("Which Subway opens the earliest?"),
            "operating_earliest"
        );
        assert_eq!(
            model.classify("Which store closes the latest?"),
            "operating_latest"
        );
    }

    #[test]
    fn unrelated_question_is_unknown() {
        assert_eq!(model().classify("Do you like football?"), UNKNOWN_INTENT);
        assert_eq!(model().classify("?!"), UNKNOWN_INTENT);
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a = tokens("alpha beta");
        let b = tokens("gamma");
        assert!(jaccard(&a, &b).abs() < f64::EPSILON);
        assert!((jaccard(&a, &a) - 1.0).abs() < f64::EPSILON);
    }
}

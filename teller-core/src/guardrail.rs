//! Sensitive-topic gate applied to user input before anything else runs.
//!
//! This is a keyword filter, not a PII detector: a phrase matches when it
//! occurs anywhere in the input, ignoring case. Paraphrases get through and
//! innocent mentions get blocked; both are accepted.

use crate::config::{default_forbidden_topics, GuardrailConfig};

/// Outcome of checking one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allowed,
    /// `reason` is the disallowed phrase that matched.
    Blocked { reason: String },
}

impl GuardrailDecision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, GuardrailDecision::Blocked { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SensitiveTopicFilter {
    /// Stored case-folded.
    phrases: Vec<String>,
}

impl SensitiveTopicFilter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &GuardrailConfig) -> Self {
        Self::new(&config.forbidden_topics)
    }

    /// True iff any disallowed phrase occurs in `text`, ignoring case.
    pub fn check(&self, text: &str) -> bool {
        self.matched(text).is_some()
    }

    pub fn evaluate(&self, text: &str) -> GuardrailDecision {
        match self.matched(text) {
            Some(phrase) => GuardrailDecision::Blocked {
                reason: phrase.to_string(),
            },
            None => GuardrailDecision::Allowed,
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    fn matched(&self, text: &str) -> Option<&str> {
        let folded = text.to_lowercase();
        self.phrases
            .iter()
            .find(|phrase| folded.contains(phrase.as_str()))
            .map(String::as_str)
    }
}

impl Default for SensitiveTopicFilter {
    fn default() -> Self {
        Self::new(default_forbidden_topics())
    }
}

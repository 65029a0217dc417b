//! Prompt construction for the generation model.
//!
//! A prompt is made of four parts, always in this order:
//!
//! ```text
//! Context: <policy preamble>
//!
//! Relevant Information:
//! - <passage>
//! - <passage>
//!
//! User Question: <user input>
//!
//! Provide a helpful response while maintaining security and privacy standards.
//! ```
//!
//! The "Relevant Information" header stays even when nothing was retrieved.
//! Nothing is truncated here; length limits are the model server's business.

use crate::config::{Config, DEFAULT_POLICY, DEFAULT_REFUSAL};
use crate::guardrail::SensitiveTopicFilter;

const CLOSING_INSTRUCTION: &str =
    "Provide a helpful response while maintaining security and privacy standards.";

/// Result of assembling a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembled {
    /// The input was blocked; this text is the assistant's reply and must not
    /// be sent to the model.
    Refusal(String),
    /// Prompt ready for generation.
    Prompt(String),
}

impl Assembled {
    pub fn is_refusal(&self) -> bool {
        matches!(self, Assembled::Refusal(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Assembled::Refusal(text) | Assembled::Prompt(text) => text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptAssembler {
    policy: String,
    refusal: String,
    filter: SensitiveTopicFilter,
}

impl PromptAssembler {
    pub fn new(
        policy: impl Into<String>,
        refusal: impl Into<String>,
        filter: SensitiveTopicFilter,
    ) -> Self {
        Self {
            policy: policy.into(),
            refusal: refusal.into(),
            filter,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.system_prompt.clone(),
            config.guardrails.refusal_message.clone(),
            SensitiveTopicFilter::from_config(&config.guardrails),
        )
    }

    pub fn filter(&self) -> &SensitiveTopicFilter {
        &self.filter
    }

    pub fn refusal(&self) -> &str {
        &self.refusal
    }

    /// Builds the text for this turn: the refusal for blocked input, the
    /// full prompt otherwise.
    pub fn build<S: AsRef<str>>(&self, user_input: &str, retrieved: &[S]) -> String {
        self.assemble(user_input, retrieved).into_string()
    }

    pub fn assemble<S: AsRef<str>>(&self, user_input: &str, retrieved: &[S]) -> Assembled {
        if self.filter.check(user_input) {
            return Assembled::Refusal(self.refusal.clone());
        }

        Assembled::Prompt(self.compose(user_input, retrieved))
    }

    /// Formats the prompt without consulting the filter. Callers must have
    /// already cleared `user_input`.
    pub fn compose<S: AsRef<str>>(&self, user_input: &str, retrieved: &[S]) -> String {
        let mut prompt = format!("Context: {}\n\nRelevant Information:\n", self.policy);
        for passage in retrieved {
            prompt.push_str("- ");
            prompt.push_str(passage.as_ref());
            prompt.push('\n');
        }
        prompt.push_str(&format!("\nUser Question: {}\n\n{}", user_input, CLOSING_INSTRUCTION));
        prompt
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY, DEFAULT_REFUSAL, SensitiveTopicFilter::default())
    }
}

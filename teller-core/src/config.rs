use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub const DEFAULT_POLICY: &str = "You are a helpful banking assistant. You can:
- Explain banking products and services
- Help with general account questions
- Provide financial education
- Assist with transaction explanations

You cannot:
- Access specific account details
- Make transactions
- Change account settings
- Share sensitive information";

pub const DEFAULT_REFUSAL: &str =
    "I apologize, but I cannot discuss sensitive account information. How else may I help you?";

pub const DEFAULT_FALLBACK: &str =
    "I apologize, but I'm having trouble generating a response at the moment. Please try again.";

/// Configuration for the whole assistant.
///
/// Every section falls back to its defaults when missing from the file, so a
/// config only needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    /// Policy preamble placed at the top of every prompt
    pub system_prompt: String,
    /// Reply used when the generation backend fails
    pub fallback_message: String,
    pub rag: RagConfig,
    pub guardrails: GuardrailConfig,
}

/// Configuration for the generation model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Per-request timeout for the model server, in seconds
    pub timeout_secs: u64,
}

/// Retrieval backend used by the document index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Embedding vectors compared by squared Euclidean distance
    #[default]
    Dense,
    /// TF-IDF weights compared by cosine similarity
    Lexical,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Dense => write!(f, "dense"),
            StrategyKind::Lexical => write!(f, "lexical"),
        }
    }
}

/// Configuration for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub strategy: StrategyKind,
    pub embedding_model: String,
    pub embedding_dim: usize,
    /// Number of passages retrieved per turn
    pub top_k: usize,
}

/// Configuration for the sensitive-topic gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Phrases matched case-insensitively anywhere in the user input
    pub forbidden_topics: Vec<String>,
    pub refusal_message: String,
}

pub fn default_forbidden_topics() -> Vec<String> {
    [
        "account number",
        "account numbers",
        "social security",
        "password",
        "pin number",
        "mother's maiden name",
        "credit card number",
        "routing number",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            forbidden_topics: default_forbidden_topics(),
            refusal_message: DEFAULT_REFUSAL.to_string(),
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            // all-MiniLM-L6-v2 as packaged by Ollama
            embedding_model: "all-minilm".to_string(),
            embedding_dim: 384,
            top_k: 3,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            system_prompt: DEFAULT_POLICY.to_string(),
            fallback_message: DEFAULT_FALLBACK.to_string(),
            rag: RagConfig::default(),
            guardrails: GuardrailConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `config.yaml` if it exists, otherwise use defaults.
    pub fn load_or_default() -> Self {
        Self::load_or_default_from("config.yaml")
    }

    /// Like [`Config::load`], but falls back to defaults. A missing file is
    /// silent; an unreadable or malformed one is logged.
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::FileRead(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config, falling back to defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rag_config_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.strategy, StrategyKind::Dense);
        assert_eq!(config.embedding_model, "all-minilm");
        assert_eq!(config.embedding_dim, 384);
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_guardrail_defaults_cover_account_numbers() {
        let config = GuardrailConfig::default();
        assert!(config.forbidden_topics.contains(&"account number".to_string()));
        assert!(config.forbidden_topics.contains(&"routing number".to_string()));
        assert_eq!(config.refusal_message, DEFAULT_REFUSAL);
    }

    #[test]
    fn test_load_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "llm:\n  model: mistral\nrag:\n  strategy: lexical\n  top_k: 5").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.rag.strategy, StrategyKind::Lexical);
        assert_eq!(config.rag.top_k, 5);
        assert_eq!(config.rag.embedding_dim, 384);
        assert_eq!(config.system_prompt, DEFAULT_POLICY);
    }

    #[test]
    fn test_load_rejects_unknown_strategy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rag:\n  strategy: fuzzy").unwrap();

        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config = serde_yaml::from_str(include_str!("../../config.example.yaml")).unwrap();
        let defaults = Config::default();

        assert_eq!(config.llm.model, defaults.llm.model);
        assert_eq!(config.rag.strategy, defaults.rag.strategy);
        assert_eq!(config.guardrails.forbidden_topics, defaults.guardrails.forbidden_topics);
        assert_eq!(config.guardrails.refusal_message, defaults.guardrails.refusal_message);
        assert_eq!(config.fallback_message, defaults.fallback_message);
    }

    #[test]
    fn test_load_or_default_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "llm:\n  model: mistral\nrag:\n  top_k: [not, a, number]").unwrap();

        let config = Config::load_or_default_from(file.path());

        assert_eq!(config.llm.model, "llama3.1");
        assert_eq!(config.rag.top_k, 3);
    }

    #[test]
    fn test_load_or_default_from_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rag:\n  top_k: 7").unwrap();

        assert_eq!(Config::load_or_default_from(file.path()).rag.top_k, 7);
        assert_eq!(Config::load_or_default_from("/nonexistent/teller/config.yaml").rag.top_k, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/teller/config.yaml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}

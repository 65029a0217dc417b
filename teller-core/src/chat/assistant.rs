//! Turn-by-turn orchestration of the assistant.
//!
//! # Turn Flow
//!
//! ```text
//! User Input → Guardrail → blocked? ─ yes → Refusal
//!                              │
//!                              no
//!                              ↓
//!                     Retrieval (top-k)
//!                              ↓
//!                      Prompt assembly
//!                              ↓
//!                         Generation → Reply
//! ```
//!
//! Both the user input and the reply are appended to the caller's
//! [`ConversationLog`]. A blocked turn touches neither the index nor the
//! model server.

use crate::config::Config;
use crate::gateway::GenerationGateway;
use crate::history::{ConversationLog, Role};
use crate::knowledge::BANKING_DOCUMENTS;
use crate::prompt::PromptAssembler;
use crate::provider::{OllamaProvider, Provider};
use crate::rag::DocumentIndex;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the assistant answered for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Passages given to the model, best-first. Empty for blocked turns.
    pub sources: Vec<String>,
    pub blocked: bool,
}

/// Long-lived services shared by every turn.
///
/// The assistant holds no conversation state; each call to
/// [`respond`](Self::respond) gets the session's log explicitly. It is cheap
/// to clone, and clones share the same index.
///
/// # Examples
///
/// ```no_run
/// use teller_core::{Assistant, Config, ConversationLog};
///
/// # async fn example() -> anyhow::Result<()> {
/// let assistant = Assistant::new(Config::load_or_default()).await?;
/// let mut log = ConversationLog::new();
///
/// let reply = assistant.respond(&mut log, "What is a money market account?").await;
/// println!("{}", reply.content);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Assistant {
    index: DocumentIndex,
    assembler: PromptAssembler,
    gateway: GenerationGateway,
    top_k: usize,
}

impl Assistant {
    /// Creates an assistant backed by Ollama over the built-in corpus.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the index
    /// cannot be built (for the dense strategy this needs the embedding
    /// model to be reachable).
    pub async fn new(config: Config) -> Result<Self> {
        let provider: Arc<dyn Provider> =
            Arc::new(OllamaProvider::new(&config).context("Failed to create Ollama client")?);
        Self::with_provider(config, provider, BANKING_DOCUMENTS.iter().copied()).await
    }

    /// Creates an assistant over `passages` with an explicit provider.
    pub async fn with_provider<I, S>(
        config: Config,
        provider: Arc<dyn Provider>,
        passages: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = DocumentIndex::from_config(&config, provider.clone(), passages)
            .await
            .with_context(|| format!("Failed to build {} index", config.rag.strategy))?;
        info!(documents = index.len(), strategy = %index.strategy(), "Knowledge base ready");

        Ok(Self::from_parts(
            index,
            PromptAssembler::from_config(&config),
            GenerationGateway::from_config(&config, provider),
            config.rag.top_k,
        ))
    }

    pub fn from_parts(
        index: DocumentIndex,
        assembler: PromptAssembler,
        gateway: GenerationGateway,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            assembler,
            gateway,
            top_k,
        }
    }

    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    /// Handles one user turn and records it in `log`.
    ///
    /// Never fails: retrieval problems leave the context empty, generation
    /// problems produce the fallback message.
    pub async fn respond(&self, log: &mut ConversationLog, user_input: &str) -> Reply {
        log.add_message(Role::User, user_input);

        let reply = self.answer(user_input).await;

        log.add_message(Role::Assistant, reply.content.as_str());
        reply
    }

    async fn answer(&self, user_input: &str) -> Reply {
        let decision = self.assembler.filter().evaluate(user_input);
        if decision.is_blocked() {
            warn!(?decision, "Input blocked by guardrail");
            return Reply {
                content: self.assembler.refusal().to_string(),
                sources: Vec::new(),
                blocked: true,
            };
        }

        let sources = self.index.search_passages(user_input, self.top_k).await;
        debug!(retrieved = sources.len(), "Context retrieved");

        let prompt = self.assembler.compose(user_input, &sources);
        let content = self.gateway.generate(&prompt).await;
        info!(model = %self.gateway.model(), sources = sources.len(), "Turn answered");
        Reply {
            content,
            sources,
            blocked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StrategyKind, DEFAULT_FALLBACK, DEFAULT_POLICY, DEFAULT_REFUSAL};
    use crate::provider::testing::{FakeProvider, FAKE_DIM};
    use std::sync::atomic::Ordering;

    fn dense_config() -> Config {
        let mut config = Config::default();
        config.rag.strategy = StrategyKind::Dense;
        config.rag.embedding_dim = FAKE_DIM;
        config
    }

    fn lexical_config() -> Config {
        let mut config = Config::default();
        config.rag.strategy = StrategyKind::Lexical;
        config
    }

    async fn assistant(provider: &Arc<FakeProvider>, config: Config) -> Assistant {
        Assistant::with_provider(config, provider.clone(), BANKING_DOCUMENTS.iter().copied())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_allowed_turn_retrieves_and_generates() {
        let provider = Arc::new(FakeProvider::new("A CD locks your money for a fixed term."));
        let assistant = assistant(&provider, dense_config()).await;
        let mut log = ConversationLog::new();

        let reply = assistant.respond(&mut log, "What is a certificate of deposit?").await;

        assert!(!reply.blocked);
        assert_eq!(reply.content, "A CD locks your money for a fixed term.");
        assert_eq!(reply.sources.len(), 3);
        assert_eq!(provider.generate_calls(), 1);

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].starts_with(&format!("Context: {DEFAULT_POLICY}")));
        assert!(prompts[0].contains("User Question: What is a certificate of deposit?"));
        for source in &reply.sources {
            assert!(prompts[0].contains(&format!("- {source}\n")));
        }
    }

    #[tokio::test]
    async fn test_allowed_turn_sends_composed_prompt() {
        let provider = Arc::new(FakeProvider::new("Savings earn interest."));
        let assistant = assistant(&provider, lexical_config()).await;
        let mut log = ConversationLog::new();

        let reply = assistant.respond(&mut log, "How do savings accounts work?").await;

        let expected = assistant.assembler.compose("How do savings accounts work?", &reply.sources);
        assert_eq!(*provider.prompts.lock().unwrap(), vec![expected]);
    }

    #[tokio::test]
    async fn test_blocked_turn_skips_retrieval_and_generation() {
        let provider = Arc::new(FakeProvider::new("should not be used"));
        let assistant = assistant(&provider, dense_config()).await;
        let embeds_after_build = provider.embed_calls();
        let mut log = ConversationLog::new();

        let reply = assistant.respond(&mut log, "my account number is 12345").await;

        assert!(reply.blocked);
        assert_eq!(reply.content, DEFAULT_REFUSAL);
        assert!(reply.sources.is_empty());
        assert_eq!(provider.embed_calls(), embeds_after_build);
        assert_eq!(provider.generate_calls(), 0);
    }

    #[tokio::test]
    async fn test_turns_are_logged_in_order() {
        let provider = Arc::new(FakeProvider::new("Sure."));
        let assistant = assistant(&provider, lexical_config()).await;
        let mut log = ConversationLog::new();

        assistant.respond(&mut log, "What is my PIN number?").await;
        assistant.respond(&mut log, "What is overdraft?").await;

        let turns: Vec<(Role, &str)> = log.turns().iter().map(|t| (t.role, t.content.as_str())).collect();
        assert_eq!(
            turns,
            vec![
                (Role::User, "What is my PIN number?"),
                (Role::Assistant, DEFAULT_REFUSAL),
                (Role::User, "What is overdraft?"),
                (Role::Assistant, "Sure."),
            ]
        );
    }

    #[tokio::test]
    async fn test_generation_failure_returns_fallback() {
        let provider = Arc::new(FakeProvider::new("unused"));
        provider.fail_generate.store(true, Ordering::SeqCst);
        let assistant = assistant(&provider, dense_config()).await;
        let mut log = ConversationLog::new();

        let reply = assistant.respond(&mut log, "How do wire transfers work?").await;

        assert!(!reply.blocked);
        assert_eq!(reply.content, DEFAULT_FALLBACK);
        assert_eq!(log.last().unwrap().content, DEFAULT_FALLBACK);
    }

    #[tokio::test]
    async fn test_retrieval_failure_still_answers() {
        let provider = Arc::new(FakeProvider::new("Here is what I know."));
        let assistant = assistant(&provider, dense_config()).await;
        provider.fail_embed.store(true, Ordering::SeqCst);
        let mut log = ConversationLog::new();

        let reply = assistant.respond(&mut log, "How do wire transfers work?").await;

        assert_eq!(reply.content, "Here is what I know.");
        assert!(reply.sources.is_empty());
        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("Relevant Information:\n\nUser Question:"));
    }

    #[tokio::test]
    async fn test_build_failure_is_reported() {
        let provider = Arc::new(FakeProvider::new(""));
        let result = Assistant::with_provider(dense_config(), provider, Vec::<String>::new()).await;
        assert!(result.is_err());
    }
}

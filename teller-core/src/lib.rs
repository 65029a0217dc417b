//! teller-core - Retrieval-augmented banking assistant engine
//!
//! Provides the components of a single assistant turn:
//! - Document index over a fixed knowledge base (dense or lexical retrieval)
//! - Sensitive-topic guardrail
//! - Prompt assembly
//! - Generation gateway to an Ollama-compatible model server
//! - Conversation log
//!
//! ## Primary API
//!
//! Most users only need [`Assistant`], which wires the pieces together and
//! answers one turn at a time.

// Public modules
pub mod chat;
pub mod config;
pub mod gateway;
pub mod guardrail;
pub mod history;
pub mod knowledge;
pub mod prompt;
pub mod provider;
pub mod rag;

// Public exports
pub use chat::{Assistant, Reply};
pub use config::{Config, StrategyKind};
pub use gateway::GenerationGateway;
pub use guardrail::{GuardrailDecision, SensitiveTopicFilter};
pub use history::{ConversationLog, ConversationTurn, Role};
pub use prompt::{Assembled, PromptAssembler};
pub use rag::{DocumentIndex, SearchResult};

// Provider exports
pub use provider::{GenerateRequest, GenerateResponse, OllamaProvider, Provider, ProviderError};

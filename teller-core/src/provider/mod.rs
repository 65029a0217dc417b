//! Model server abstraction layer.
//!
//! This module defines a common interface over the external model server
//! used for text generation and for embeddings. The pipeline only ever talks
//! to a [`Provider`]; the HTTP details live in the implementations.

mod types;
pub mod ollama;

#[cfg(test)]
pub(crate) mod testing;

// Re-export common types
pub use types::{
    Provider,
    ProviderError,
    Result,
    GenerateRequest,
    GenerateResponse,
    EmbedRequest,
    EmbedResponse,
};

// Re-export provider implementations
pub use ollama::OllamaProvider;

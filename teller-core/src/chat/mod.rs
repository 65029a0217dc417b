//! Conversation handling on top of retrieval, guardrails and generation.

mod assistant;

pub use assistant::{Assistant, Reply};

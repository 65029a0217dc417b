//! Embedding generation using model server providers.
//!
//! This module provides functionality to convert text into vector embeddings
//! using provider embedding models.

use crate::provider::{Provider, ProviderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Number of passages sent to the provider per embedding request.
const BATCH_SIZE: usize = 32;

/// Errors that can occur during embedding generation.
#[derive(Debug, Error)]
pub enum EmbedderError {
    /// The provider API returned an error.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The model produced a vector of the wrong size.
    #[error("Embedding has {actual} dimensions, expected {expected}")]
    Dimension { expected: usize, actual: usize },

    /// The provider returned a different number of vectors than texts sent.
    #[error("Provider returned {actual} embeddings for {expected} texts")]
    Count { expected: usize, actual: usize },
}

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedderError>;

/// Generates fixed-size vector embeddings for text.
///
/// The dimension is fixed for the lifetime of the embedder; every vector the
/// provider returns is checked against it so that the index never mixes
/// vectors of different sizes.
///
/// # Supported Models
///
/// - `all-minilm` - 384-dimensional embeddings (all-MiniLM-L6-v2), the default
/// - `nomic-embed-text` - 768-dimensional embeddings
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn Provider>,
    model: String,
    dimension: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Generates a vector embedding for the given text.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model server is unreachable or the model is not available
    /// - The returned vector does not have the configured dimension
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.provider.embed(text, &self.model).await?;
        self.check_dimension(&embedding)?;
        Ok(embedding)
    }

    /// Embeds every text in order, batching requests to the provider.
    pub async fn embed_all(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            debug!(batch_size = batch.len(), model = %self.model, "Embedding batch");
            let vectors = self.provider.embed_batch(batch, &self.model).await?;
            if vectors.len() != batch.len() {
                return Err(EmbedderError::Count {
                    expected: batch.len(),
                    actual: vectors.len(),
                });
            }
            for vector in &vectors {
                self.check_dimension(vector)?;
            }
            embeddings.extend(vectors);
        }

        Ok(embeddings)
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(EmbedderError::Dimension {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }
}

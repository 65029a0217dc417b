//! Flat exact nearest-neighbour index over embeddings.
//!
//! Every passage is embedded once at build time and stored in a single
//! contiguous buffer. Queries are compared against all of them by squared
//! Euclidean distance; lower distance means higher relevance.

use super::embedder::{Embedder, EmbedderError};
use super::strategy::{top_k, Relevance, RetrievalStrategy};
use super::types::Document;
use super::{IndexError, Result};
use crate::config::StrategyKind;
use async_trait::async_trait;
use tracing::{debug, info};

pub struct DenseIndex {
    embedder: Embedder,
    dimension: usize,
    /// Row-major `len * dimension` matrix, row `i` is document `i`.
    vectors: Vec<f32>,
}

impl DenseIndex {
    /// Embeds the corpus and inserts each vector exactly once.
    pub async fn build(embedder: Embedder, documents: &[Document]) -> Result<Self> {
        if embedder.dimension() == 0 {
            return Err(IndexError::ZeroDimension);
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embeddings = embedder.embed_all(&texts).await?;
        if embeddings.len() != documents.len() {
            return Err(EmbedderError::Count {
                expected: documents.len(),
                actual: embeddings.len(),
            }
            .into());
        }

        let dimension = embedder.dimension();
        let mut vectors = Vec::with_capacity(documents.len() * dimension);
        for embedding in embeddings {
            vectors.extend_from_slice(&embedding);
        }

        info!(documents = documents.len(), dimension, "Built dense index");
        Ok(Self {
            embedder,
            dimension,
            vectors,
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.vectors.len() / self.dimension
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

#[async_trait]
impl RetrievalStrategy for DenseIndex {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Dense
    }

    async fn rank(&self, query: &str, k: usize) -> Result<Vec<(usize, f32)>> {
        let query_vector = self.embedder.embed(query).await?;
        debug!(dimension = query_vector.len(), "Query embedded");

        let distances: Vec<f32> = self
            .vectors
            .chunks_exact(self.dimension)
            .map(|row| squared_l2(row, &query_vector))
            .collect();

        Ok(top_k(distances, k, Relevance::LowerIsBetter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{FakeProvider, FAKE_DIM};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn docs(passages: &[&str]) -> Vec<Document> {
        passages
            .iter()
            .enumerate()
            .map(|(i, p)| Document::new(i, *p))
            .collect()
    }

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_l2(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }

    #[tokio::test]
    async fn test_build_inserts_each_document_once() {
        let provider = Arc::new(FakeProvider::new(""));
        let embedder = Embedder::new(provider.clone(), "all-minilm", FAKE_DIM);
        let corpus = docs(&["alpha beta", "gamma delta", "epsilon"]);

        let index = DenseIndex::build(embedder, &corpus).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(provider.embed_calls(), 3);
    }

    #[tokio::test]
    async fn test_exact_match_has_zero_distance() {
        let provider = Arc::new(FakeProvider::new(""));
        let embedder = Embedder::new(provider, "all-minilm", FAKE_DIM);
        let corpus = docs(&["wire transfers abroad", "mobile check deposit", "safe deposit boxes"]);

        let index = DenseIndex::build(embedder, &corpus).await.unwrap();
        let ranked = index.rank("mobile check deposit", 3).await.unwrap();

        assert_eq!(ranked[0], (1, 0.0));
        assert!(ranked[1].1 >= ranked[0].1);
        assert!(ranked[2].1 >= ranked[1].1);
    }

    #[tokio::test]
    async fn test_build_fails_when_provider_drops_vectors() {
        let provider = Arc::new(FakeProvider::new(""));
        provider.drop_first_in_batch.store(true, Ordering::SeqCst);
        let embedder = Embedder::new(provider, "all-minilm", FAKE_DIM);
        let corpus = docs(&["alpha one", "beta two", "gamma three"]);

        let result = DenseIndex::build(embedder, &corpus).await;

        assert!(matches!(
            result,
            Err(IndexError::Embedder(EmbedderError::Count { expected: 3, actual: 2 }))
        ));
    }
}

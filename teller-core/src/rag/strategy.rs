//! Retrieval strategy abstraction and factory.
//!
//! This module provides a unified interface over the two ways the index can
//! rank passages: dense embeddings and lexical term weights.

use super::dense::DenseIndex;
use super::embedder::Embedder;
use super::lexical::LexicalIndex;
use super::types::Document;
use super::Result;
use crate::config::StrategyKind;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;

/// Unified interface for ranking the corpus against a query.
///
/// Implementations own the per-document representation built at construction
/// time and never mutate it afterwards, so a strategy can be shared freely
/// between sessions.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> StrategyKind;

    /// Ranks the corpus against `query`.
    ///
    /// # Returns
    ///
    /// At most `k` `(document id, score)` pairs, best-first, with exact ties
    /// ordered by ascending id.
    async fn rank(&self, query: &str, k: usize) -> Result<Vec<(usize, f32)>>;
}

/// Build-time choice of retrieval backend.
#[derive(Clone)]
pub enum Strategy {
    /// Flat exact nearest-neighbour search over embeddings.
    Dense(Embedder),
    /// TF-IDF with cosine similarity.
    Lexical,
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Dense(_) => StrategyKind::Dense,
            Strategy::Lexical => StrategyKind::Lexical,
        }
    }
}

/// Creates the strategy instance over an already validated corpus.
pub async fn create_strategy(
    strategy: Strategy,
    documents: &[Document],
) -> Result<Arc<dyn RetrievalStrategy>> {
    match strategy {
        Strategy::Dense(embedder) => {
            let index = DenseIndex::build(embedder, documents).await?;
            Ok(Arc::new(index))
        }
        Strategy::Lexical => {
            let index = LexicalIndex::build(documents)?;
            Ok(Arc::new(index))
        }
    }
}

/// Direction in which a score improves.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Relevance {
    LowerIsBetter,
    HigherIsBetter,
}

/// Picks the `k` best scores, where `scores[i]` belongs to document `i`.
pub(crate) fn top_k(scores: Vec<f32>, k: usize, relevance: Relevance) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();

    ranked.sort_by(|a, b| {
        let by_score = match relevance {
            Relevance::LowerIsBetter => a.1.total_cmp(&b.1),
            Relevance::HigherIsBetter => b.1.total_cmp(&a.1),
        };
        match by_score {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        }
    });

    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_lower_is_better() {
        let ranked = top_k(vec![3.0, 1.0, 2.0], 2, Relevance::LowerIsBetter);
        assert_eq!(ranked, vec![(1, 1.0), (2, 2.0)]);
    }

    #[test]
    fn test_top_k_higher_is_better() {
        let ranked = top_k(vec![0.1, 0.9, 0.5], 3, Relevance::HigherIsBetter);
        assert_eq!(ranked, vec![(1, 0.9), (2, 0.5), (0, 0.1)]);
    }

    #[test]
    fn test_top_k_ties_prefer_lower_id() {
        let ranked = top_k(vec![0.5, 0.7, 0.5, 0.7], 4, Relevance::HigherIsBetter);
        let ids: Vec<usize> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);

        let ranked = top_k(vec![2.0, 2.0, 1.0], 2, Relevance::LowerIsBetter);
        let ids: Vec<usize> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 0]);
    }

    #[test]
    fn test_top_k_larger_than_input() {
        assert_eq!(top_k(vec![1.0], 10, Relevance::LowerIsBetter).len(), 1);
        assert!(top_k(vec![1.0, 2.0], 0, Relevance::LowerIsBetter).is_empty());
    }
}

//! Retrieval over the fixed knowledge base.
//!
//! This module builds a searchable index over a small, static corpus of
//! reference passages and answers top-k nearest-neighbour queries against it.
//!
//! # Architecture
//!
//! - [`DocumentIndex`]: Owns the corpus and the chosen strategy, and is the
//!   only entry point used by the chat pipeline
//! - [`strategy`]: The [`RetrievalStrategy`] trait and its factory
//! - `dense`: Embedding vectors in a flat exact index, squared Euclidean distance
//! - `lexical`: TF-IDF term weights, cosine similarity
//! - [`Embedder`]: Converts text to fixed-size vectors through a provider
//!
//! # Failure Policy
//!
//! Building the index reports errors normally. Searching never does: any
//! failure while representing the query or ranking is logged and turns into
//! an empty result, because retrieval only enriches the prompt and the turn
//! must go on without it.

mod dense;
mod embedder;
mod lexical;
mod stop_words;
pub mod strategy;
mod types;

pub use embedder::{Embedder, EmbedderError};
pub use strategy::{RetrievalStrategy, Strategy};
pub use types::{Document, SearchResult};

use crate::config::{Config, StrategyKind};
use crate::provider::Provider;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Number of passages returned when the caller does not specify one.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Corpus is empty")]
    EmptyCorpus,

    #[error("Document {id} is empty")]
    EmptyDocument { id: usize },

    #[error("Corpus has no indexable terms")]
    EmptyVocabulary,

    #[error("Embedding dimension must be greater than zero")]
    ZeroDimension,

    #[error("Embedder error: {0}")]
    Embedder(#[from] EmbedderError),
}

pub type Result<T> = std::result::Result<T, IndexError>;

/// Searchable index over a fixed, ordered corpus.
///
/// The index is built once and is read-only afterwards. It is `Clone` (the
/// corpus and strategy sit behind `Arc`) and can be shared across sessions
/// without locking.
///
/// # Example
///
/// ```no_run
/// # use teller_core::rag::{DocumentIndex, Strategy};
/// # async fn example() -> teller_core::rag::Result<()> {
/// let index = DocumentIndex::build(
///     ["Savings accounts earn interest", "Auto loans finance vehicles"],
///     Strategy::Lexical,
/// ).await?;
///
/// for hit in index.search("how do savings accounts work", 1).await {
///     println!("{}", hit.content());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DocumentIndex {
    documents: Arc<[Document]>,
    strategy: Arc<dyn RetrievalStrategy>,
}

impl DocumentIndex {
    /// Builds the index over `passages`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The corpus or any passage is empty
    /// - The lexical vocabulary ends up empty
    /// - Embedding the corpus fails (dense strategy)
    pub async fn build<I, S>(passages: I, strategy: Strategy) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents: Vec<Document> = passages
            .into_iter()
            .enumerate()
            .map(|(id, text)| Document::new(id, text))
            .collect();

        if documents.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }
        if let Some(doc) = documents.iter().find(|d| d.content.trim().is_empty()) {
            return Err(IndexError::EmptyDocument { id: doc.id });
        }

        let strategy = strategy::create_strategy(strategy, &documents).await?;

        Ok(Self {
            documents: documents.into(),
            strategy,
        })
    }

    /// Builds the index with the strategy named in `config.rag`.
    pub async fn from_config<I, S>(
        config: &Config,
        provider: Arc<dyn Provider>,
        passages: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let strategy = match config.rag.strategy {
            StrategyKind::Dense => Strategy::Dense(Embedder::new(
                provider,
                config.rag.embedding_model.clone(),
                config.rag.embedding_dim,
            )),
            StrategyKind::Lexical => Strategy::Lexical,
        };
        Self::build(passages, strategy).await
    }

    /// Returns the `k` passages most relevant to `query`, best-first.
    ///
    /// `k` is clamped to the corpus size. Exact ties keep corpus order.
    /// Failures are logged and yield an empty result.
    pub async fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        let k = k.min(self.documents.len());
        if k == 0 {
            return Vec::new();
        }

        match self.strategy.rank(query, k).await {
            Ok(ranked) => {
                debug!(strategy = %self.strategy.kind(), hits = ranked.len(), "Search complete");
                ranked
                    .into_iter()
                    .filter_map(|(id, score)| {
                        self.documents.get(id).map(|document| SearchResult {
                            document: document.clone(),
                            score,
                        })
                    })
                    .collect()
            }
            Err(e) => {
                error!(strategy = %self.strategy.kind(), error = %e, "Search failed, continuing without context");
                Vec::new()
            }
        }
    }

    /// Like [`search`](Self::search), keeping only the passage text.
    pub async fn search_passages(&self, query: &str, k: usize) -> Vec<String> {
        self.search(query, k)
            .await
            .into_iter()
            .map(|hit| hit.document.content)
            .collect()
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

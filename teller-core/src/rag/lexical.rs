//! TF-IDF index with cosine similarity.
//!
//! Text is lowercased and split into runs of two or more word characters;
//! English stop-words are dropped. Each document becomes a sparse vector of
//! raw term counts scaled by the smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1` and normalised to unit length. Queries are
//! projected into the same vocabulary, so terms the corpus never uses carry
//! no weight.
//!
//! A query sharing no term with the corpus scores zero against every
//! document and therefore comes back in corpus order.

use super::stop_words::ENGLISH_STOP_WORDS;
use super::strategy::{top_k, Relevance, RetrievalStrategy};
use super::types::Document;
use super::{IndexError, Result};
use crate::config::StrategyKind;
use async_trait::async_trait;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Sparse vector: `(term id, weight)` sorted by term id.
type SparseVector = Vec<(usize, f32)>;

pub struct LexicalIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    rows: Vec<SparseVector>,
}

pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !STOP_WORDS.contains(*token))
        .map(str::to_string)
        .collect()
}

impl LexicalIndex {
    pub fn build(documents: &[Document]) -> Result<Self> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(&d.content)).collect();

        // Sorted vocabulary keeps term ids stable across builds.
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(IndexError::EmptyVocabulary);
        }

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (term_id, (term, df)) in document_frequency.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), term_id);
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }

        let mut index = Self {
            vocabulary,
            idf,
            rows: Vec::with_capacity(documents.len()),
        };
        index.rows = tokenized.iter().map(|tokens| index.weigh(tokens)).collect();

        info!(documents = documents.len(), terms = index.idf.len(), "Built lexical index");
        Ok(index)
    }

    #[cfg(test)]
    fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Turns tokens into a unit-length TF-IDF vector; unknown terms are skipped.
    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for token in tokens {
            if let Some(&term_id) = self.vocabulary.get(token) {
                *counts.entry(term_id).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(term_id, tf)| (term_id, tf * self.idf[term_id]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in vector.iter_mut() {
                *w /= norm;
            }
        }
        vector
    }
}

/// Dot product of two unit vectors sorted by term id.
fn cosine(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

#[async_trait]
impl RetrievalStrategy for LexicalIndex {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lexical
    }

    async fn rank(&self, query: &str, k: usize) -> Result<Vec<(usize, f32)>> {
        let query_vector = self.weigh(&tokenize(query));
        debug!(terms = query_vector.len(), "Query weighted");

        let similarities: Vec<f32> = self.rows.iter().map(|row| cosine(row, &query_vector)).collect();

        Ok(top_k(similarities, k, Relevance::HigherIsBetter))
    }
}

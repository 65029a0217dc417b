/// A passage of the knowledge base.
///
/// Documents are created once when the index is built and never change
/// afterwards. The `id` is the passage's position in the corpus, so it doubles
/// as the tie-breaker when two passages score exactly the same.
///
/// The searchable representation (embedding or term weights) is owned by the
/// retrieval strategy and keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: usize,
    pub content: String,
}

impl Document {
    pub fn new(id: usize, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// A search hit: a document and the strategy's score for it.
///
/// Results are returned best-first. The score is only meaningful to the
/// strategy that produced it (a distance for dense search, a similarity for
/// lexical search), so it is not exposed outside the crate.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub document: Document,
    pub(crate) score: f32,
}

impl SearchResult {
    pub fn id(&self) -> usize {
        self.document.id
    }

    pub fn content(&self) -> &str {
        &self.document.content
    }
}

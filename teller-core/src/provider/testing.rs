//! In-process provider used by unit tests.

use super::types::*;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) const FAKE_DIM: usize = 384;

/// Deterministic provider with hashed bag-of-words embeddings and call counters.
#[derive(Default)]
pub(crate) struct FakeProvider {
    pub reply: String,
    pub fail_generate: AtomicBool,
    pub fail_embed: AtomicBool,
    /// Makes `embed_batch` lose the first text of every batch.
    pub drop_first_in_batch: AtomicBool,
    /// Switches embeddings to [`stemmed_embedding`].
    pub stem_words: AtomicBool,
    pub embed_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Default::default()
        }
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

/// Hashes lowercase alphanumeric words into a fixed number of buckets.
pub(crate) fn hashed_embedding(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; FAKE_DIM];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in word.to_lowercase().bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        vector[(hash % FAKE_DIM as u64) as usize] += 1.0;
    }
    vector
}

/// Unit-length bag of three-letter word prefixes, so `save` and `savings`
/// land in the same bucket. Words shorter than three letters are skipped.
pub(crate) fn stemmed_embedding(text: &str) -> Vec<f32> {
    let stems: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(|w| w.to_lowercase().chars().take(3).collect())
        .collect();
    let mut vector = hashed_embedding(&stems.join(" "));
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

#[async_trait]
impl Provider for FakeProvider {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt);

        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(ProviderError::Api { status: 500, body: "model not loaded".to_string() });
        }

        Ok(GenerateResponse {
            model: request.model,
            response: self.reply.clone(),
            done: true,
        })
    }

    async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_embed.load(Ordering::SeqCst) {
            return Err(ProviderError::Other("embedding backend unavailable".to_string()));
        }

        if self.stem_words.load(Ordering::SeqCst) {
            return Ok(stemmed_embedding(text));
        }
        Ok(hashed_embedding(text))
    }

    async fn embed_batch(&self, texts: &[&str], model: &str) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text, model).await?);
        }
        if self.drop_first_in_batch.load(Ordering::SeqCst) && !embeddings.is_empty() {
            embeddings.remove(0);
        }
        Ok(embeddings)
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    IndexedPassage, ScoredPassage, VectorIndex, VectorIndexError,
};
use crate::domain::Embedding;

/// In-memory stand-in for the vector index. Returns the passages it was
/// seeded with, ignoring the query vector, and records search calls.
pub struct MockVectorIndex {
    passages: Mutex<Vec<IndexedPassage>>,
    search_calls: AtomicUsize,
    last_limit: AtomicUsize,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded(passages: Vec<IndexedPassage>) -> Self {
        Self {
            passages: Mutex::new(passages),
            search_calls: AtomicUsize::new(0),
            last_limit: AtomicUsize::new(0),
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }
}

impl Default for MockVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn ensure_collection(&self, _dimension: usize) -> Result<bool, VectorIndexError> {
        Ok(false)
    }

    async fn replace_document(
        &self,
        file_hash: &str,
        passages: &[IndexedPassage],
        _embeddings: &[Embedding],
    ) -> Result<(), VectorIndexError> {
        let mut stored = self.passages.lock().expect("mock passage lock poisoned");
        stored.retain(|passage| passage.file_hash != file_hash);
        stored.extend_from_slice(passages);
        Ok(())
    }

    async fn search(
        &self,
        _embedding: &Embedding,
        limit: usize,
    ) -> Result<Vec<ScoredPassage>, VectorIndexError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);

        let stored = self.passages.lock().expect("mock passage lock poisoned");

        Ok(stored
            .iter()
            .take(limit)
            .enumerate()
            .map(|(rank, passage)| ScoredPassage {
                passage: passage.clone(),
                score: 1.0 - rank as f32 * 0.01,
            })
            .collect())
    }
}

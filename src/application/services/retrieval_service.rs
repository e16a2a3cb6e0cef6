use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    Embedder, EmbedderError, ScoredPassage, VectorIndex, VectorIndexError,
};
use crate::domain::InferenceSource;

pub const MIN_RESULT_COUNT: usize = 1;
pub const MAX_RESULT_COUNT: usize = 16;

/// Similarity search over previously embedded chunks. Results come back
/// in index relevance order; no local re-ranking happens here.
pub struct RetrievalService<V>
where
    V: VectorIndex,
{
    embedder: Arc<dyn Embedder>,
    vector_index: Arc<V>,
    result_count: usize,
}

impl<V> RetrievalService<V>
where
    V: VectorIndex,
{
    /// `result_count` is clamped to `[MIN_RESULT_COUNT, MAX_RESULT_COUNT]`
    /// regardless of the requested value.
    pub fn new(embedder: Arc<dyn Embedder>, vector_index: Arc<V>, result_count: usize) -> Self {
        Self {
            embedder,
            vector_index,
            result_count: result_count.clamp(MIN_RESULT_COUNT, MAX_RESULT_COUNT),
        }
    }

    pub fn result_count(&self) -> usize {
        self.result_count
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn search(&self, query: &str) -> Result<Vec<InferenceSource>, RetrievalError> {
        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(RetrievalError::Embedding)?;

        let passages = self
            .vector_index
            .search(&query_embedding, self.result_count)
            .await
            .map_err(RetrievalError::Search)?;

        tracing::debug!(hits = passages.len(), "similarity search complete");

        Ok(passages.into_iter().map(source_from_passage).collect())
    }
}

/// Maps an index hit to a client-facing source: the file name is reduced
/// to its basename and page numbers become one-based.
fn source_from_passage(scored: ScoredPassage) -> InferenceSource {
    let passage = scored.passage;

    let base_name = Path::new(&passage.file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| passage.file_name.clone());

    InferenceSource {
        text: passage.text,
        file_name: base_name,
        file_hash: passage.file_hash,
        start_page_no: passage.start_page_no + 1,
        end_page_no: passage.end_page_no + 1,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("search: {0}")]
    Search(VectorIndexError),
}

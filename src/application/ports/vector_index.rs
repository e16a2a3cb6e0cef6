use async_trait::async_trait;

use crate::domain::Embedding;

/// A passage stored in the vector index together with its provenance.
/// Page numbers are zero-based as produced by the chunking pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPassage {
    pub text: String,
    pub file_name: String,
    pub file_hash: String,
    pub start_page_no: u32,
    pub end_page_no: u32,
}

/// One similarity search hit, in index relevance order.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: IndexedPassage,
    pub score: f32,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Creates the backing collection if it does not exist yet. Returns
    /// `true` when a collection was created.
    async fn ensure_collection(&self, dimension: usize) -> Result<bool, VectorIndexError>;

    /// Replaces all passages of a document: existing points carrying
    /// `file_hash` are removed before the new ones are written.
    async fn replace_document(
        &self,
        file_hash: &str,
        passages: &[IndexedPassage],
        embeddings: &[Embedding],
    ) -> Result<(), VectorIndexError>;

    async fn search(
        &self,
        embedding: &Embedding,
        limit: usize,
    ) -> Result<Vec<ScoredPassage>, VectorIndexError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VectorIndexError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("collection creation failed: {0}")]
    CollectionCreationFailed(String),
    #[error("payload index creation failed: {0}")]
    PayloadIndexFailed(String),
    #[error("upsert failed: {0}")]
    UpsertFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("search failed: {0}")]
    SearchFailed(String),
}

use async_trait::async_trait;

use crate::domain::LocalizedText;

/// Turns raw document bytes into overlapping, page-attributed text chunks
/// ready for embedding. Restartable: every call re-runs extraction from
/// scratch.
#[async_trait]
pub trait ChunkSplitter: Send + Sync {
    async fn split_document(
        &self,
        document_data: &[u8],
    ) -> Result<Vec<LocalizedText>, ChunkSplitterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkSplitterError {
    #[error("document parsing failed: {0}")]
    Parse(String),
    #[error("invalid chunking configuration: {0}")]
    InvalidConfiguration(String),
    #[error("splitting failed: {0}")]
    SplittingFailed(String),
}

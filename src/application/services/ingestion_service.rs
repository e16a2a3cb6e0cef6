use std::sync::Arc;

use crate::application::ports::{
    ChunkSplitter, ChunkSplitterError, Embedder, EmbedderError, IndexedPassage, VectorIndex,
    VectorIndexError,
};

/// Indexes one document: chunk, embed in batches, replace the document's
/// points in the vector index.
pub struct IngestionService<V>
where
    V: VectorIndex,
{
    chunk_splitter: Arc<dyn ChunkSplitter>,
    embedder: Arc<dyn Embedder>,
    vector_index: Arc<V>,
    embedding_batch_size: usize,
}

impl<V> IngestionService<V>
where
    V: VectorIndex,
{
    pub fn new(
        chunk_splitter: Arc<dyn ChunkSplitter>,
        embedder: Arc<dyn Embedder>,
        vector_index: Arc<V>,
        embedding_batch_size: usize,
    ) -> Self {
        Self {
            chunk_splitter,
            embedder,
            vector_index,
            embedding_batch_size: embedding_batch_size.max(1),
        }
    }

    /// Returns the number of chunks written to the index.
    #[tracing::instrument(
        skip(self, document_data),
        fields(file_hash = %file_hash, size = document_data.len())
    )]
    pub async fn ingest(
        &self,
        document_data: &[u8],
        file_name: &str,
        file_hash: &str,
    ) -> Result<usize, IngestionError> {
        let chunks = self.chunk_splitter.split_document(document_data).await?;

        if chunks.is_empty() {
            tracing::warn!("document produced no chunks");
            return Ok(0);
        }

        let passages: Vec<IndexedPassage> = chunks
            .into_iter()
            .map(|chunk| IndexedPassage {
                text: chunk.text,
                file_name: file_name.to_string(),
                file_hash: file_hash.to_string(),
                start_page_no: chunk.start_page_no,
                end_page_no: chunk.end_page_no,
            })
            .collect();

        let mut embeddings = Vec::with_capacity(passages.len());
        for batch in passages.chunks(self.embedding_batch_size) {
            let texts: Vec<&str> = batch.iter().map(|passage| passage.text.as_str()).collect();
            embeddings.extend(self.embedder.embed_batch(&texts).await?);
        }

        self.vector_index
            .replace_document(file_hash, &passages, &embeddings)
            .await?;

        tracing::info!(chunks = passages.len(), "document indexed");

        Ok(passages.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("chunking: {0}")]
    Chunking(#[from] ChunkSplitterError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("indexing: {0}")]
    Indexing(#[from] VectorIndexError),
}

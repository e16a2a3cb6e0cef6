use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::DocumentRecord;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts or refreshes a registry entry, keyed by content hash.
    async fn upsert(&self, record: &DocumentRecord) -> Result<(), RepositoryError>;

    async fn find_by_hash(&self, file_hash: &str)
    -> Result<Option<DocumentRecord>, RepositoryError>;

    /// Case-insensitive substring search over file names.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<DocumentRecord>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<DocumentRecord>, RepositoryError>;
}

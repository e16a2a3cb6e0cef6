use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::application::ports::{DocumentRepository, RepositoryError};
use crate::domain::DocumentRecord;

/// Keeps the document registry in step with the PDFs on the document
/// share. Entries are keyed by content hash.
pub struct DocumentSyncService {
    repository: Arc<dyn DocumentRepository>,
    documents_dir: PathBuf,
}

impl DocumentSyncService {
    pub fn new(repository: Arc<dyn DocumentRepository>, documents_dir: PathBuf) -> Self {
        Self {
            repository,
            documents_dir,
        }
    }

    /// Returns the number of documents synchronized.
    #[tracing::instrument(skip(self), fields(dir = %self.documents_dir.display()))]
    pub async fn synchronize(&self) -> Result<usize, DocumentSyncError> {
        let mut paths = discover_pdfs(&self.documents_dir)?;
        paths.sort();

        let total = paths.len();

        for (n, path) in paths.iter().enumerate() {
            let data = tokio::fs::read(path).await?;
            let file_hash = sha256_hex(&data);

            let metadata = tokio::fs::metadata(path).await?;
            let modified: DateTime<Utc> = metadata.modified()?.into();
            let created: DateTime<Utc> = metadata.created().map(Into::into).unwrap_or(modified);

            let record = DocumentRecord::new(
                path.to_string_lossy().into_owned(),
                file_hash,
                data.len() as i64,
                created,
                modified,
            );

            tracing::info!(
                n = n + 1,
                total,
                file = %record.file_name,
                hash = %record.file_hash,
                "synchronizing document"
            );

            self.repository.upsert(&record).await?;
        }

        Ok(total)
    }
}

fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, DocumentSyncError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| DocumentSyncError::Walk(e.to_string()))?;

        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentSyncError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("directory walk failed: {0}")]
    Walk(String),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{DocumentRepository, RepositoryError};
use crate::domain::DocumentRecord;

const RECORD_COLUMNS: &str =
    "id, file_name, file_hash, file_size, file_creation_ts, file_modification_ts";

pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> Result<DocumentRecord, RepositoryError> {
    Ok(DocumentRecord {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        file_name: row
            .try_get("file_name")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        file_hash: row
            .try_get("file_hash")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        file_size: row
            .try_get("file_size")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        file_creation_ts: row
            .try_get("file_creation_ts")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        file_modification_ts: row
            .try_get("file_modification_ts")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
    })
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    #[instrument(skip(self, record), fields(file_hash = %record.file_hash))]
    async fn upsert(&self, record: &DocumentRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO documents
                (id, file_name, file_hash, file_size, file_creation_ts, file_modification_ts)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (file_hash) DO UPDATE SET
                file_size = EXCLUDED.file_size,
                file_creation_ts = EXCLUDED.file_creation_ts,
                file_modification_ts = EXCLUDED.file_modification_ts,
                last_modified_on = now()
            "#,
        )
        .bind(record.id)
        .bind(&record.file_name)
        .bind(&record.file_hash)
        .bind(record.file_size)
        .bind(record.file_creation_ts)
        .bind(record.file_modification_ts)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_hash(
        &self,
        file_hash: &str,
    ) -> Result<Option<DocumentRecord>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM documents WHERE file_hash = $1"
        ))
        .bind(file_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip(self, query))]
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<DocumentRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM documents WHERE file_name ILIKE $1 ORDER BY file_name LIMIT $2"
        ))
        .bind(format!("%{query}%"))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(record_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<DocumentRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM documents ORDER BY file_name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(record_from_row).collect()
    }
}

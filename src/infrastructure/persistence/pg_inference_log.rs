use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{InferenceLogStore, RepositoryError};

pub struct PgInferenceLogStore {
    pool: PgPool,
}

impl PgInferenceLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InferenceLogStore for PgInferenceLogStore {
    #[instrument(skip(self, input, output))]
    async fn record(
        &self,
        user_id: Option<Uuid>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO inference_logs (id, user_id, input, output)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(input)
        .bind(output)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}

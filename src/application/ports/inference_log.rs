use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;

/// Append-only audit trail of inference requests and their results.
#[async_trait]
pub trait InferenceLogStore: Send + Sync {
    async fn record(
        &self,
        user_id: Option<Uuid>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) -> Result<(), RepositoryError>;
}

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;

#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Identity attached to a request once its access token has been
/// verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the user or replaces their password hash.
    async fn upsert_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Uuid, RepositoryError>;

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError>;

    async fn store_token(&self, user_id: Uuid, token: &str) -> Result<(), RepositoryError>;

    async fn find_user_by_token(
        &self,
        token: &str,
    ) -> Result<Option<AuthenticatedUser>, RepositoryError>;
}

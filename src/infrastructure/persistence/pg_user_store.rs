use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{
    AuthenticatedUser, RepositoryError, UserCredentials, UserStore,
};

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, password_hash))]
    async fn upsert_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Uuid, RepositoryError> {
        let user_id = Uuid::new_v4();

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO UPDATE SET password_hash = EXCLUDED.password_hash
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.try_get("id")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|row| {
            Ok(UserCredentials {
                user_id: row
                    .try_get("id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                username: row
                    .try_get("username")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                password_hash: row
                    .try_get("password_hash")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, token))]
    async fn store_token(&self, user_id: Uuid, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO access_tokens (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn find_user_by_token(
        &self,
        token: &str,
    ) -> Result<Option<AuthenticatedUser>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username
            FROM access_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|row| {
            Ok(AuthenticatedUser {
                user_id: row
                    .try_get("id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                username: row
                    .try_get("username")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            })
        })
        .transpose()
    }
}

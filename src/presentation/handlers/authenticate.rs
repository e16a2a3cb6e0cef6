use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, VectorIndex};
use crate::infrastructure::auth::{generate_token, verify_credentials};
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthenticateResponse {
    pub token: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn authenticate_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Json(request): Json<AuthenticateRequest>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    let credentials = match state.user_store.find_credentials(&request.username).await {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(error = %e, "credential lookup failed");
            return internal_error();
        }
    };

    let valid = credentials
        .as_ref()
        .is_some_and(|c| verify_credentials(&request.password, &c.password_hash));

    let Some(credentials) = credentials.filter(|_| valid) else {
        tracing::info!(username = %request.username, "authentication rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "invalid credentials".to_string(),
            }),
        )
            .into_response();
    };

    let token = generate_token();

    match state
        .user_store
        .store_token(credentials.user_id, &token)
        .await
    {
        Ok(()) => {
            tracing::info!(username = %credentials.username, "authentication successful");
            (StatusCode::OK, Json(AuthenticateResponse { token })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "token storage failed");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "authentication unavailable".to_string(),
        }),
    )
        .into_response()
}

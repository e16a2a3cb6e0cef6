use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::ports::UserStore;
use crate::presentation::handlers::ErrorResponse;

const TOKEN_COOKIE: &str = "access_token";

/// Verifies the bearer token (or `access_token` cookie) against the user
/// store and attaches the authenticated user to the request. Requests
/// without a valid token never reach the protected handlers.
pub async fn require_access_token(
    State(user_store): State<Arc<dyn UserStore>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).or_else(|| cookie_token(request.headers()));

    let Some(token) = token else {
        return unauthorized();
    };

    match user_store.find_user_by_token(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => unauthorized(),
        Err(e) => {
            tracing::error!(error = %e, "token lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "authentication unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "missing or invalid access token".to_string(),
        }),
    )
        .into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == TOKEN_COOKIE).then(|| value.to_string())
    })
}

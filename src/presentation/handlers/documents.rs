use std::path::Path;

use axum::extract::{Path as PathParam, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, VectorIndex};
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

const SEARCH_RESULT_LIMIT: usize = 50;

#[derive(Deserialize)]
pub struct DocumentSearchRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct DocumentDto {
    pub file_name: String,
    pub file_hash: String,
}

#[tracing::instrument(skip(state))]
pub async fn download_document_handler<L, V>(
    State(state): State<AppState<L, V>>,
    PathParam(file_hash): PathParam<String>,
) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    let record = match state.document_repository.find_by_hash(&file_hash).await {
        Ok(Some(record)) => record,
        Ok(None) => return not_found(),
        Err(e) => {
            tracing::error!(error = %e, "document lookup failed");
            return internal_error();
        }
    };

    match tokio::fs::read(&record.file_name).await {
        Ok(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            data,
        )
            .into_response(),
        Err(e) => {
            // Registered but unreadable on disk is reported as not found.
            tracing::error!(error = %e, file = %record.file_name, "document file unreadable");
            not_found()
        }
    }
}

pub async fn search_documents_post_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Json(request): Json<DocumentSearchRequest>,
) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    run_document_search(state, request.query).await
}

pub async fn search_documents_get_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Query(request): Query<DocumentSearchRequest>,
) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    run_document_search(state, request.query).await
}

#[tracing::instrument(skip(state, query))]
async fn run_document_search<L, V>(state: AppState<L, V>, query: String) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    match state
        .document_repository
        .search(&query, SEARCH_RESULT_LIMIT)
        .await
    {
        Ok(records) => {
            let documents: Vec<DocumentDto> = records
                .into_iter()
                .map(|record| DocumentDto {
                    file_name: basename(&record.file_name),
                    file_hash: record.file_hash,
                })
                .collect();

            (StatusCode::OK, Json(documents)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "document search failed");
            internal_error()
        }
    }
}

fn basename(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "document not found".to_string(),
        }),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "document lookup failed".to_string(),
        }),
    )
        .into_response()
}

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::application::ports::{AuthenticatedUser, LlmClient, VectorIndex};
use crate::application::services::InferenceError;
use crate::domain::{InferenceInteraction, InferenceSource, Originator};
use crate::infrastructure::observability::sanitize_for_log;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginatorDto {
    User,
    Agent,
}

impl From<OriginatorDto> for Originator {
    fn from(dto: OriginatorDto) -> Self {
        match dto {
            OriginatorDto::User => Originator::User,
            OriginatorDto::Agent => Originator::Agent,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct InteractionDto {
    pub originator: OriginatorDto,
    pub text: String,
}

#[derive(Deserialize)]
pub struct InferenceQueryRequest {
    pub inference_interactions: Vec<InteractionDto>,
}

#[derive(Serialize)]
pub struct SourceDto {
    pub text: String,
    pub file_name: String,
    pub file_hash: String,
    pub start_page_no: u32,
    pub end_page_no: u32,
}

impl From<InferenceSource> for SourceDto {
    fn from(source: InferenceSource) -> Self {
        Self {
            text: source.text,
            file_name: source.file_name,
            file_hash: source.file_hash,
            start_page_no: source.start_page_no,
            end_page_no: source.end_page_no,
        }
    }
}

#[derive(Serialize)]
pub struct InferenceQueryResponse {
    pub text: String,
    pub sources: Vec<SourceDto>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[tracing::instrument(skip(state, user, request), fields(username = %user.username))]
pub async fn inference_query_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<InferenceQueryRequest>,
) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    if let Some(current) = request.inference_interactions.last() {
        tracing::debug!(question = %sanitize_for_log(&current.text), "processing inference query");
    }

    let interactions: Vec<InferenceInteraction> = request
        .inference_interactions
        .iter()
        .map(|dto| InferenceInteraction::new(dto.originator.into(), dto.text.clone()))
        .collect();

    match state.inference_service.infer(&interactions).await {
        Ok(result) => {
            let response = InferenceQueryResponse {
                text: result.text,
                sources: result.sources.into_iter().map(SourceDto::from).collect(),
            };

            let input = serde_json::to_value(&request.inference_interactions).unwrap_or_default();
            let output = serde_json::to_value(&response).unwrap_or_default();
            if let Err(e) = state
                .inference_log
                .record(Some(user.user_id), input, output)
                .await
            {
                tracing::warn!(error = %e, "failed to record inference log");
            }

            (StatusCode::OK, Json(response)).into_response()
        }
        Err(InferenceError::EmptyHistory) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "interaction history must not be empty".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "inference failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "inference failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn inference_search_post_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Json(request): Json<SearchRequest>,
) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    run_inference_search(state, request.query).await
}

pub async fn inference_search_get_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Query(request): Query<SearchRequest>,
) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    run_inference_search(state, request.query).await
}

#[tracing::instrument(skip(state, query))]
async fn run_inference_search<L, V>(state: AppState<L, V>, query: String) -> Response
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    tracing::debug!(query = %sanitize_for_log(&query), "processing index search");

    match state.retrieval_service.search(&query).await {
        Ok(sources) => {
            let sources: Vec<SourceDto> = sources.into_iter().map(SourceDto::from).collect();
            (StatusCode::OK, Json(sources)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "index search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "search failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{LlmClient, VectorIndex};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::auth::require_access_token;
use crate::presentation::handlers::{
    authenticate_handler, download_document_handler, health_handler, inference_query_handler,
    inference_search_get_handler, inference_search_post_handler, search_documents_get_handler,
    search_documents_post_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<L, V>(state: AppState<L, V>) -> Router
where
    L: LlmClient + 'static,
    V: VectorIndex + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let protected = Router::new()
        .route("/api/inference/query", post(inference_query_handler::<L, V>))
        .route(
            "/api/inference/search",
            get(inference_search_get_handler::<L, V>).post(inference_search_post_handler::<L, V>),
        )
        .route(
            "/api/search_documents",
            get(search_documents_get_handler::<L, V>).post(search_documents_post_handler::<L, V>),
        )
        .route(
            "/api/document/{file_hash}",
            get(download_document_handler::<L, V>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.user_store.clone(),
            require_access_token,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/authenticate", post(authenticate_handler::<L, V>))
        .merge(protected)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use aerodoc::application::ports::{
    AuthenticatedUser, DocumentRepository, Embedder, IndexedPassage, InferenceLogStore,
    RepositoryError, UserCredentials, UserStore,
};
use aerodoc::application::services::{InferenceService, RetrievalService};
use aerodoc::domain::DocumentRecord;
use aerodoc::infrastructure::auth::hash_credentials;
use aerodoc::infrastructure::llm::{MockEmbedder, MockLlmClient};
use aerodoc::infrastructure::persistence::MockVectorIndex;
use aerodoc::presentation::{create_router, AppState};

const USERNAME: &str = "engineer";
const PASSWORD: &str = "wrench-time";
const KNOWN_HASH: &str = "a1b2c3d4";

struct InMemoryUserStore {
    credentials: UserCredentials,
    tokens: Mutex<HashMap<String, AuthenticatedUser>>,
}

impl InMemoryUserStore {
    fn new() -> Self {
        Self {
            credentials: UserCredentials {
                user_id: Uuid::new_v4(),
                username: USERNAME.to_string(),
                password_hash: hash_credentials(PASSWORD).expect("hashing must succeed"),
            },
            tokens: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert_user(
        &self,
        _username: &str,
        _password_hash: &str,
    ) -> Result<Uuid, RepositoryError> {
        Ok(self.credentials.user_id)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        Ok((username == self.credentials.username).then(|| self.credentials.clone()))
    }

    async fn store_token(&self, user_id: Uuid, token: &str) -> Result<(), RepositoryError> {
        self.tokens.lock().unwrap().insert(
            token.to_string(),
            AuthenticatedUser {
                user_id,
                username: self.credentials.username.clone(),
            },
        );
        Ok(())
    }

    async fn find_user_by_token(
        &self,
        token: &str,
    ) -> Result<Option<AuthenticatedUser>, RepositoryError> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }
}

struct InMemoryDocumentRepository {
    records: Vec<DocumentRecord>,
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn upsert(&self, _record: &DocumentRecord) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn find_by_hash(
        &self,
        file_hash: &str,
    ) -> Result<Option<DocumentRecord>, RepositoryError> {
        Ok(self
            .records
            .iter()
            .find(|record| record.file_hash == file_hash)
            .cloned())
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<DocumentRecord>, RepositoryError> {
        Ok(self
            .records
            .iter()
            .filter(|record| {
                record
                    .file_name
                    .to_lowercase()
                    .contains(&query.to_lowercase())
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<DocumentRecord>, RepositoryError> {
        Ok(self.records.clone())
    }
}

struct CountingInferenceLog {
    records: AtomicUsize,
}

#[async_trait]
impl InferenceLogStore for CountingInferenceLog {
    async fn record(
        &self,
        _user_id: Option<Uuid>,
        _input: serde_json::Value,
        _output: serde_json::Value,
    ) -> Result<(), RepositoryError> {
        self.records.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct TestHarness {
    router: axum::Router,
    inference_log: Arc<CountingInferenceLog>,
    document_file: std::path::PathBuf,
}

fn build_harness(llm_responses: &[&str]) -> TestHarness {
    let document_file = std::env::temp_dir().join(format!("aerodoc-test-{}.pdf", Uuid::new_v4()));
    std::fs::write(&document_file, b"%PDF-1.4 test bytes").expect("temp file must be writable");

    let embedder: Arc<dyn Embedder> = Arc::new(MockEmbedder::new(8));
    let llm_client = Arc::new(MockLlmClient::with_responses(llm_responses.to_vec()));

    let vector_index = Arc::new(MockVectorIndex::seeded(vec![IndexedPassage {
        text: "Normal oil pressure is 220-525 kPa.".to_string(),
        file_name: "/srv/documents/manual.pdf".to_string(),
        file_hash: KNOWN_HASH.to_string(),
        start_page_no: 2,
        end_page_no: 2,
    }]));

    let retrieval_service = Arc::new(RetrievalService::new(embedder, vector_index, 4));
    let inference_service = Arc::new(InferenceService::new(
        llm_client,
        Arc::clone(&retrieval_service),
        true,
    ));

    let inference_log = Arc::new(CountingInferenceLog {
        records: AtomicUsize::new(0),
    });

    let now = chrono::Utc::now();
    let state = AppState {
        inference_service,
        retrieval_service,
        document_repository: Arc::new(InMemoryDocumentRepository {
            records: vec![DocumentRecord::new(
                document_file.to_string_lossy().into_owned(),
                KNOWN_HASH.to_string(),
                19,
                now,
                now,
            )],
        }),
        inference_log: Arc::clone(&inference_log) as Arc<dyn InferenceLogStore>,
        user_store: Arc::new(InMemoryUserStore::new()),
    };

    TestHarness {
        router: create_router(state),
        inference_log,
        document_file,
    }
}

async fn authenticate(router: &axum::Router) -> String {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/authenticate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"username": USERNAME, "password": PASSWORD}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn given_running_server_when_checking_health_then_status_is_healthy() {
    let harness = build_harness(&[]);

    let response = harness
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_no_token_when_querying_then_request_is_unauthorized() {
    let harness = build_harness(&[]);

    let response = harness
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/inference/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"inference_interactions": []}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_wrong_password_when_authenticating_then_request_is_unauthorized() {
    let harness = build_harness(&[]);

    let response = harness
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/authenticate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"username": USERNAME, "password": "guess"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_technical_question_when_querying_then_answer_carries_attributed_sources() {
    let harness = build_harness(&["TECHNICAL", "Check the oil pressure sender first."]);
    let token = authenticate(&harness.router).await;

    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/inference/query")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::json!({
                        "inference_interactions": [
                            {"originator": "user", "text": "My oil pressure dropped, Jabiru 5100"}
                        ]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["text"], "Check the oil pressure sender first.");
    assert_eq!(json["sources"][0]["file_name"], "manual.pdf");
    assert_eq!(json["sources"][0]["file_hash"], KNOWN_HASH);
    assert_eq!(json["sources"][0]["start_page_no"], 3);
    assert_eq!(json["sources"][0]["end_page_no"], 3);

    assert_eq!(harness.inference_log.records.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_empty_interaction_list_when_querying_then_request_is_rejected() {
    let harness = build_harness(&[]);
    let token = authenticate(&harness.router).await;

    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/inference/query")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::json!({"inference_interactions": []}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.inference_log.records.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_search_query_when_searching_documents_then_basenames_are_returned() {
    let harness = build_harness(&[]);
    let token = authenticate(&harness.router).await;

    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/search_documents")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::json!({"query": "aerodoc-test"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["file_hash"], KNOWN_HASH);
    let file_name = json[0]["file_name"].as_str().unwrap();
    assert!(!file_name.contains('/'));
}

#[tokio::test]
async fn given_index_search_when_searching_then_sources_are_returned_without_inference() {
    let harness = build_harness(&[]);
    let token = authenticate(&harness.router).await;

    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/inference/search")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::json!({"query": "oil pressure"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json[0]["file_name"], "manual.pdf");
    assert_eq!(json[0]["start_page_no"], 3);
}

#[tokio::test]
async fn given_unknown_hash_when_downloading_then_document_is_not_found() {
    let harness = build_harness(&[]);
    let token = authenticate(&harness.router).await;

    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/document/ffffffff")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_known_hash_when_downloading_then_file_bytes_are_served() {
    let harness = build_harness(&[]);
    let token = authenticate(&harness.router).await;

    let response = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/document/{KNOWN_HASH}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"%PDF-1.4 test bytes");

    std::fs::remove_file(&harness.document_file).ok();
}

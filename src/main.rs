use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use aerodoc::application::ports::{
    ChunkSplitter, DocumentRepository, Embedder, UserStore, VectorIndex,
};
use aerodoc::application::services::{
    DocumentSyncService, InferenceService, IngestionService, RetrievalService,
};
use aerodoc::infrastructure::auth::hash_credentials;
use aerodoc::infrastructure::llm::{HttpEmbedder, HttpLlmClient};
use aerodoc::infrastructure::observability::{init_telemetry, TelemetryConfig};
use aerodoc::infrastructure::persistence::{
    create_pool, PgDocumentRepository, PgInferenceLogStore, PgUserStore, QdrantVectorIndex,
};
use aerodoc::infrastructure::text_processing::{ChunkTokenizer, SentenceChunker};
use aerodoc::presentation::{create_router, AppState, Environment, Settings};

#[derive(Parser)]
#[command(
    name = "aerodoc",
    about = "Retrieval-augmented assistant for aircraft maintenance documentation"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP backend.
    Serve,
    /// Synchronize the document registry with the documents directory.
    SyncDocuments,
    /// Synchronize the registry, then chunk, embed, and index every
    /// registered document.
    Ingest,
    /// Create a backend user or reset their password.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment)?;

    init_telemetry(TelemetryConfig::default());
    tracing::info!(%environment, "starting");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::SyncDocuments => sync_documents(settings).await,
        Command::Ingest => ingest(settings).await,
        Command::CreateUser { username, password } => {
            create_user(settings, &username, &password).await
        }
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        settings.embeddings.endpoint.clone(),
        settings.embeddings.api_key.clone(),
        settings.embeddings.model.clone(),
        settings.embeddings.batch_size,
    ));

    let llm_client = Arc::new(HttpLlmClient::new(
        settings.llm.endpoint.clone(),
        settings.llm.api_key.clone(),
        settings.llm.model.clone(),
        settings.llm.max_tokens,
        settings.llm.temperature,
    ));

    let vector_index = Arc::new(
        QdrantVectorIndex::connect(&settings.qdrant.url, settings.qdrant.collection_name.clone())
            .await?,
    );
    vector_index
        .ensure_collection(settings.embeddings.dimension)
        .await?;

    let retrieval_service = Arc::new(RetrievalService::new(
        Arc::clone(&embedder),
        Arc::clone(&vector_index),
        settings.retrieval.result_count,
    ));

    let inference_service = Arc::new(InferenceService::new(
        Arc::clone(&llm_client),
        Arc::clone(&retrieval_service),
        settings.retrieval.classify_intent,
    ));

    let state = AppState {
        inference_service,
        retrieval_service,
        document_repository: Arc::new(PgDocumentRepository::new(pool.clone())),
        inference_log: Arc::new(PgInferenceLogStore::new(pool.clone())),
        user_store: Arc::new(PgUserStore::new(pool)),
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, router).await?;

    Ok(())
}

async fn create_user(settings: Settings, username: &str, password: &str) -> anyhow::Result<()> {
    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_store = PgUserStore::new(pool);
    let password_hash = hash_credentials(password)?;
    let user_id = user_store.upsert_user(username, &password_hash).await?;

    tracing::info!(%username, %user_id, "user created");

    Ok(())
}

async fn sync_documents(settings: Settings) -> anyhow::Result<()> {
    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repository: Arc<dyn DocumentRepository> = Arc::new(PgDocumentRepository::new(pool));
    let sync_service =
        DocumentSyncService::new(repository, PathBuf::from(&settings.documents.dir));

    let count = sync_service.synchronize().await?;
    tracing::info!(count, "document registry synchronized");

    Ok(())
}

async fn ingest(settings: Settings) -> anyhow::Result<()> {
    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repository: Arc<dyn DocumentRepository> = Arc::new(PgDocumentRepository::new(pool));
    let sync_service = DocumentSyncService::new(
        Arc::clone(&repository),
        PathBuf::from(&settings.documents.dir),
    );
    sync_service.synchronize().await?;

    let tokenizer = Arc::new(ChunkTokenizer::cl100k()?);
    let chunk_splitter: Arc<dyn ChunkSplitter> = Arc::new(SentenceChunker::new(
        tokenizer,
        settings.chunking.chunk_size,
        settings.chunking.chunk_overlap,
    )?);

    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        settings.embeddings.endpoint.clone(),
        settings.embeddings.api_key.clone(),
        settings.embeddings.model.clone(),
        settings.embeddings.batch_size,
    ));

    let vector_index = Arc::new(
        QdrantVectorIndex::connect(&settings.qdrant.url, settings.qdrant.collection_name.clone())
            .await?,
    );
    vector_index
        .ensure_collection(settings.embeddings.dimension)
        .await?;

    let ingestion_service = IngestionService::new(
        chunk_splitter,
        embedder,
        vector_index,
        settings.embeddings.batch_size,
    );

    for record in repository.list_all().await? {
        let data = tokio::fs::read(&record.file_name).await?;
        let chunks = ingestion_service
            .ingest(&data, &record.file_name, &record.file_hash)
            .await?;
        tracing::info!(file = %record.file_name, chunks, "document ingested");
    }

    Ok(())
}

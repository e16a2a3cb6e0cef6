use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub qdrant: QdrantSettings,
    pub embeddings: EmbeddingsSettings,
    pub llm: LlmSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub documents: DocumentSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QdrantSettings {
    pub url: String,
    pub collection_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsSettings {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    pub result_count: usize,
    pub classify_intent: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSettings {
    pub dir: String,
}

impl Settings {
    /// Layered configuration: built-in defaults, then an optional
    /// `appsettings.{environment}` file, then `APP_`-prefixed environment
    /// variables (`APP_SERVER__PORT` style).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "postgres://localhost:5432/aerodoc")?
            .set_default("database.max_connections", 10)?
            .set_default("qdrant.url", "http://localhost:6334")?
            .set_default("qdrant.collection_name", "document_chunks")?
            .set_default("embeddings.endpoint", "http://localhost:8080/v1/embeddings")?
            .set_default("embeddings.api_key", "")?
            .set_default("embeddings.model", "bge-large-en")?
            .set_default("embeddings.dimension", 1024)?
            .set_default("embeddings.batch_size", 150)?
            .set_default("llm.endpoint", "http://localhost:8080/v1/chat/completions")?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.max_tokens", 620)?
            .set_default("llm.temperature", 0.1)?
            .set_default("chunking.chunk_size", 640)?
            .set_default("chunking.chunk_overlap", 60)?
            .set_default("retrieval.result_count", 4)?
            .set_default("retrieval.classify_intent", true)?
            .set_default("documents.dir", "documents")?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}

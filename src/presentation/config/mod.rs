mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, DatabaseSettings, DocumentSettings, EmbeddingsSettings, LlmSettings,
    QdrantSettings, RetrievalSettings, ServerSettings, Settings,
};

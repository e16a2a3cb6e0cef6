mod chunk_splitter;
mod document_repository;
mod embedder;
mod inference_log;
mod llm_client;
mod repository_error;
mod user_store;
mod vector_index;

pub use chunk_splitter::{ChunkSplitter, ChunkSplitterError};
pub use document_repository::DocumentRepository;
pub use embedder::{Embedder, EmbedderError};
pub use inference_log::InferenceLogStore;
pub use llm_client::{LlmClient, LlmClientError};
pub use repository_error::RepositoryError;
pub use user_store::{AuthenticatedUser, UserCredentials, UserStore};
pub use vector_index::{IndexedPassage, ScoredPassage, VectorIndex, VectorIndexError};

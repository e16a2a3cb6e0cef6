mod mock_vector_index;
mod pg_document_repository;
mod pg_inference_log;
mod pg_pool;
mod pg_user_store;
mod qdrant_index;

pub use mock_vector_index::MockVectorIndex;
pub use pg_document_repository::PgDocumentRepository;
pub use pg_inference_log::PgInferenceLogStore;
pub use pg_pool::create_pool;
pub use pg_user_store::PgUserStore;
pub use qdrant_index::QdrantVectorIndex;

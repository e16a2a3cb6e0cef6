mod document_sync;
mod inference_service;
mod ingestion_service;
pub mod prompts;
mod retrieval_service;

pub use document_sync::{DocumentSyncError, DocumentSyncService};
pub use inference_service::{InferenceError, InferenceService};
pub use ingestion_service::{IngestionError, IngestionService};
pub use retrieval_service::{RetrievalError, RetrievalService, MAX_RESULT_COUNT, MIN_RESULT_COUNT};

use std::sync::Arc;

use crate::application::ports::{
    DocumentRepository, InferenceLogStore, LlmClient, UserStore, VectorIndex,
};
use crate::application::services::{InferenceService, RetrievalService};

pub struct AppState<L, V>
where
    L: LlmClient,
    V: VectorIndex,
{
    pub inference_service: Arc<InferenceService<L, V>>,
    pub retrieval_service: Arc<RetrievalService<V>>,
    pub document_repository: Arc<dyn DocumentRepository>,
    pub inference_log: Arc<dyn InferenceLogStore>,
    pub user_store: Arc<dyn UserStore>,
}

impl<L, V> Clone for AppState<L, V>
where
    L: LlmClient,
    V: VectorIndex,
{
    fn clone(&self) -> Self {
        Self {
            inference_service: Arc::clone(&self.inference_service),
            retrieval_service: Arc::clone(&self.retrieval_service),
            document_repository: Arc::clone(&self.document_repository),
            inference_log: Arc::clone(&self.inference_log),
            user_store: Arc::clone(&self.user_store),
        }
    }
}

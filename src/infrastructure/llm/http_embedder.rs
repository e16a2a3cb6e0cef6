use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

/// Client for the remote embedding service. Inputs are shipped in
/// windows of `batch_size` texts to respect the service's request
/// limits; output order matches input order.
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: Vec<&'a str>,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(endpoint: String, api_key: String, model: String, batch_size: usize) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            model,
            batch_size: batch_size.max(1),
        }
    }

    async fn embed_window(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let request_body = EmbeddingRequest {
            input: texts.to_vec(),
            model: &self.model,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedderError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbedderError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedderError::ApiRequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedderError::InvalidResponse(e.to_string()))?;

        if embedding_response.data.len() != texts.len() {
            return Err(EmbedderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embedding_response.data.len()
            )));
        }

        Ok(embedding_response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.embedding))
            .collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        let results = self.embed_batch(&[text]).await?;

        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::InvalidResponse("empty response".to_string()))
    }

    #[tracing::instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for window in texts.chunks(self.batch_size) {
            embeddings.extend(self.embed_window(window).await?);
        }

        Ok(embeddings)
    }
}

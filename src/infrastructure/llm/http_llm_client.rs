use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};

/// Chat-completions client for the language model service. Responses are
/// capped by the configured output-token budget; no streaming.
pub struct HttpLlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl HttpLlmClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        max_tokens: usize,
        temperature: f32,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            model,
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let request_body = CompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("no choices returned".to_string()))
    }
}

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};

/// Canned in-process language model for tests and local development.
/// Scripted responses are handed out in order; once the script runs dry
/// every call returns a fixed fallback answer.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<String>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_responses<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        let scripted = self
            .responses
            .lock()
            .expect("mock response lock poisoned")
            .pop_front();

        Ok(scripted.unwrap_or_else(|| "Mock answer".to_string()))
    }
}

mod http_embedder;
mod http_llm_client;
mod mock_embedder;
mod mock_llm_client;

pub use http_embedder::HttpEmbedder;
pub use http_llm_client::HttpLlmClient;
pub use mock_embedder::MockEmbedder;
pub use mock_llm_client::MockLlmClient;

use tiktoken_rs::CoreBPE;

/// Token counter shared between chunk sizing and the embedding model
/// family. Built once at startup and injected wherever token counts are
/// needed.
pub struct ChunkTokenizer {
    bpe: CoreBPE,
}

impl ChunkTokenizer {
    pub fn cl100k() -> Result<Self, TokenizerInitError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerInitError(e.to_string()))?;
        Ok(Self { bpe })
    }

    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize tokenizer: {0}")]
pub struct TokenizerInitError(pub String);

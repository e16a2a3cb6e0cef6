use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError, VectorIndex};
use crate::application::services::prompts::{
    self, CASUAL_PROMPT_TEMPLATE, CLASSIFICATION_PROMPT_TEMPLATE, TECHNICAL_PROMPT_TEMPLATE,
};
use crate::application::services::{RetrievalError, RetrievalService};
use crate::domain::{InferenceInteraction, InferenceResult, Originator};

/// Runs the multi-step prompting protocol: optional classification of the
/// current turn, conditional retrieval, prompt assembly with conversation
/// history, model invocation, and assembly of the attributed result.
pub struct InferenceService<L, V>
where
    L: LlmClient,
    V: VectorIndex,
{
    llm_client: Arc<L>,
    retrieval_service: Arc<RetrievalService<V>>,
    classify_intent: bool,
    technical_template_override: Option<String>,
}

impl<L, V> InferenceService<L, V>
where
    L: LlmClient,
    V: VectorIndex,
{
    /// With `classify_intent` disabled every turn is treated as technical
    /// and retrieval always runs.
    pub fn new(
        llm_client: Arc<L>,
        retrieval_service: Arc<RetrievalService<V>>,
        classify_intent: bool,
    ) -> Self {
        Self {
            llm_client,
            retrieval_service,
            classify_intent,
            technical_template_override: None,
        }
    }

    /// Replaces the default technical prompt template. The override uses
    /// the same `{history}` / `{question}` / `{search_results}` slots.
    pub fn with_technical_template(mut self, template: impl Into<String>) -> Self {
        self.technical_template_override = Some(template.into());
        self
    }

    #[tracing::instrument(skip(self, interaction_history), fields(turns = interaction_history.len()))]
    pub async fn infer(
        &self,
        interaction_history: &[InferenceInteraction],
    ) -> Result<InferenceResult, InferenceError> {
        if interaction_history.is_empty() {
            return Err(InferenceError::EmptyHistory);
        }

        let question = extract_question(interaction_history);
        let history = concatenate_history(interaction_history);

        let technical = if self.classify_intent {
            self.classify_technical(&history, &question).await?
        } else {
            true
        };

        let sources = if technical {
            self.retrieval_service.search(&question).await?
        } else {
            Vec::new()
        };

        let search_results = sources
            .iter()
            .map(|source| source.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let template = if technical {
            self.technical_template_override
                .as_deref()
                .unwrap_or(TECHNICAL_PROMPT_TEMPLATE)
        } else {
            CASUAL_PROMPT_TEMPLATE
        };

        let prompt = prompts::render(
            &prompts::dedent(template),
            &[
                ("history", history.as_str()),
                ("question", question.as_str()),
                ("search_results", search_results.as_str()),
            ],
        );

        let text = self
            .llm_client
            .complete(&prompt)
            .await
            .map_err(InferenceError::Completion)?;

        tracing::info!(technical, sources = sources.len(), "inference complete");

        Ok(InferenceResult { text, sources })
    }

    /// Binary intent gate deciding whether retrieval augmentation runs
    /// for this turn. Ambiguous replies default to casual.
    async fn classify_technical(
        &self,
        history: &str,
        question: &str,
    ) -> Result<bool, InferenceError> {
        let prompt = prompts::render(
            &prompts::dedent(CLASSIFICATION_PROMPT_TEMPLATE),
            &[("history", history), ("question", question)],
        );

        let reply = self
            .llm_client
            .complete(&prompt)
            .await
            .map_err(InferenceError::Completion)?;

        if reply.contains("CASUAL") {
            return Ok(false);
        }
        if reply.contains("TECHNICAL") {
            return Ok(true);
        }

        let upper = reply.to_uppercase();
        if upper.contains("CASUAL") {
            return Ok(false);
        }
        if upper.contains("TECHNICAL") {
            return Ok(true);
        }

        Ok(false)
    }
}

/// The current question is always the last turn of the history.
fn extract_question(interaction_history: &[InferenceInteraction]) -> String {
    interaction_history
        .last()
        .map(|interaction| interaction.text.trim().to_string())
        .unwrap_or_default()
}

/// Formats every turn but the current question as alternating
/// `Engineer:` / `You:` paragraphs. A history with fewer than two turns
/// renders as the literal `None.`.
fn concatenate_history(interaction_history: &[InferenceInteraction]) -> String {
    if interaction_history.len() < 2 {
        return "None.".to_string();
    }

    interaction_history[..interaction_history.len() - 1]
        .iter()
        .map(|interaction| match interaction.originator {
            Originator::Agent => format!("You: {}", interaction.text.trim()),
            Originator::User => format!("Engineer: {}", interaction.text.trim()),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("interaction history must not be empty")]
    EmptyHistory,
    #[error("retrieval: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}

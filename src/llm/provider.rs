use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMMessage, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Which of the two configured models answers a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Lower-cost model for general responses and classification
    Fast,
    /// Reasoning model, bounded by the session token budget
    Deep,
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelTier::Fast => write!(f, "fast"),
            ModelTier::Deep => write!(f, "deep"),
        }
    }
}

/// The fast and deep endpoints, both served through one adapter.
#[derive(Clone)]
pub struct ModelEndpoints {
    adapter: Arc<dyn LLMAdapter>,
    fast_model: String,
    deep_model: String,
}

impl ModelEndpoints {
    pub fn new(
        adapter: Arc<dyn LLMAdapter>,
        fast_model: impl Into<String>,
        deep_model: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            fast_model: fast_model.into(),
            deep_model: deep_model.into(),
        }
    }

    pub fn from_config(config: &LLMConfig) -> Self {
        let adapter = crate::llm::openai::OpenAIAdapter::new_with_api_base(&config.api_key, &config.api_base);
        Self::new(Arc::new(adapter), &config.fast_model, &config.deep_model)
    }

    pub fn model_name(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Deep => &self.deep_model,
        }
    }

    pub fn fast_model(&self) -> &str {
        &self.fast_model
    }

    pub fn deep_model(&self) -> &str {
        &self.deep_model
    }

    /// Send `messages` to the endpoint for `tier`.
    ///
    /// `token_budget` only applies to the deep endpoint; the fast endpoint
    /// runs with the provider's default ceiling.
    pub async fn complete(
        &self,
        tier: ModelTier,
        messages: Vec<LLMMessage>,
        token_budget: u32,
    ) -> AppResult<String> {
        let request = LLMRequest {
            model: self.model_name(tier).to_string(),
            messages,
            max_tokens: match tier {
                ModelTier::Fast => None,
                ModelTier::Deep => Some(token_budget),
            },
            temperature: None,
        };

        debug!(
            model = %request.model,
            tier = %tier,
            message_count = request.messages.len(),
            max_tokens = ?request.max_tokens,
            "Calling model endpoint"
        );

        let response = self.adapter.create_chat_completion(&request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %request.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Model usage"
            );
        }

        if response.finish_reason.as_deref() == Some("length") {
            warn!(model = %request.model, "Completion stopped at the output token ceiling");
        }

        Ok(response.content)
    }

    pub async fn complete_fast(&self, messages: Vec<LLMMessage>) -> AppResult<String> {
        self.complete(ModelTier::Fast, messages, 0).await
    }

    pub async fn complete_deep(&self, messages: Vec<LLMMessage>, token_budget: u32) -> AppResult<String> {
        self.complete(ModelTier::Deep, messages, token_budget).await
    }
}

//! Routing Agent
//!
//! Decides, per chat turn, whether the fast or the deep model answers.
//! The fast model is asked to name one of the two configured models; its
//! answer is matched case-insensitively against both identifiers.

use serde::Serialize;
use tracing::info;

use crate::llm::{ModelEndpoints, ModelTier};
use crate::types::{AppError, AppResult, LLMMessage, Role};

/// What the classifier's answer named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Deep,
    Fast,
    /// Neither model identifier appeared in the answer
    Unclassified,
}

impl Classification {
    /// Routing policy. Unclassified answers go to the fast model.
    pub fn tier(self) -> ModelTier {
        match self {
            Classification::Deep => ModelTier::Deep,
            Classification::Fast | Classification::Unclassified => ModelTier::Fast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    pub classification: Classification,
    pub tier: ModelTier,
}

impl From<Classification> for RoutingDecision {
    fn from(classification: Classification) -> Self {
        Self {
            classification,
            tier: classification.tier(),
        }
    }
}

pub fn routing_instruction(fast_model: &str, deep_model: &str) -> String {
    format!(
        "Based on the user's last message, determine whether to use '{fast}' for general responses \
         or '{deep}' for complex reasoning tasks. Please respond with only '{fast}' or '{deep}'.",
        fast = fast_model,
        deep = deep_model,
    )
}

/// Match the classifier's free-text answer against the model identifiers.
///
/// The deep identifier is checked first, so an answer naming both models
/// routes deep. Surrounding text is tolerated.
pub fn parse_classification(answer: &str, fast_model: &str, deep_model: &str) -> Classification {
    let answer = answer.to_lowercase();

    if answer.contains(&deep_model.to_lowercase()) {
        Classification::Deep
    } else if answer.contains(&fast_model.to_lowercase()) {
        Classification::Fast
    } else {
        Classification::Unclassified
    }
}

/// Classify the latest user turn of `transcript`.
///
/// A leading system message is not sent to the classifier. Exactly one
/// call reaches the fast endpoint; its failure is returned unchanged.
pub async fn classify(models: &ModelEndpoints, transcript: &[LLMMessage]) -> AppResult<RoutingDecision> {
    if !transcript.iter().any(|m| m.role == Role::User) {
        return Err(AppError::InvalidRequest(
            "routing needs at least one user message".to_string(),
        ));
    }

    let conversation = match transcript.first() {
        Some(first) if first.role == Role::System => &transcript[1..],
        _ => transcript,
    };

    let mut messages = conversation.to_vec();
    messages.push(LLMMessage::system(routing_instruction(
        models.fast_model(),
        models.deep_model(),
    )));

    let answer = models.complete_fast(messages).await?;
    let classification = parse_classification(&answer, models.fast_model(), models.deep_model());
    let decision = RoutingDecision::from(classification);

    info!(
        answer = %answer.trim(),
        classification = ?decision.classification,
        tier = %decision.tier,
        "Routed chat turn"
    );

    Ok(decision)
}

//! Chat Agent
//!
//! Runs one chat turn: route, complete with the chosen model, and record
//! the exchange in the session transcript.

use serde::Serialize;
use tracing::{info, warn};

use crate::agents::routing::{self, Classification};
use crate::llm::{ModelEndpoints, ModelTier};
use crate::session::SessionContext;
use crate::types::{AppError, AppResult, LLMMessage};

/// Stored in place of an empty completion, usually a reasoning model that
/// spent its whole budget before answering.
pub const EMPTY_COMPLETION_PLACEHOLDER: &str = "Error: There are not enough tokens to complete it";

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub reply: String,
    pub model_used: String,
    pub tier: ModelTier,
    pub classification: Classification,
}

pub struct ChatAgent;

impl ChatAgent {
    /// Answer `user_message` in the context of the session transcript.
    ///
    /// The transcript is only extended once the reply is in hand, so a
    /// failed turn leaves the session as it was.
    pub async fn run_turn(
        session: &mut SessionContext,
        models: &ModelEndpoints,
        user_message: &str,
    ) -> AppResult<ChatTurn> {
        if user_message.trim().is_empty() {
            return Err(AppError::InvalidRequest("Chat message must not be empty".to_string()));
        }

        let mut history = session.transcript().to_vec();
        history.push(LLMMessage::user(user_message));

        let decision = routing::classify(models, &history).await?;
        let model_used = models.model_name(decision.tier).to_string();

        let generated = models
            .complete(decision.tier, history, session.token_budget())
            .await?;

        let reply = if generated.trim().is_empty() {
            warn!(model = %model_used, budget = session.token_budget(), "Model returned an empty completion");
            EMPTY_COMPLETION_PLACEHOLDER.to_string()
        } else {
            generated
        };

        session.append_exchange(user_message, reply.clone());

        info!(
            session_id = %session.id(),
            model = %model_used,
            reply_len = reply.len(),
            transcript_len = session.transcript().len(),
            "Chat turn complete"
        );

        Ok(ChatTurn {
            reply,
            model_used,
            tier: decision.tier,
            classification: decision.classification,
        })
    }
}

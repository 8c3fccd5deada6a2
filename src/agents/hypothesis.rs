//! Hypothesis Agent
//!
//! Drafts a hypothetical experiment (hypothesis, methodology, outcomes)
//! with the deep model, bounded by the session token budget.

use serde::Serialize;
use tracing::info;

use crate::llm::ModelEndpoints;
use crate::session::{CachedExperiment, SessionContext};
use crate::types::{AppError, AppResult, LLMMessage};

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentOutline {
    #[serde(flatten)]
    pub experiment: CachedExperiment,
    pub cached: bool,
}

pub struct HypothesisAgent;

impl HypothesisAgent {
    pub fn create_prompt(topic: &str) -> String {
        format!(
            "Create a hypothetical experiment on the following topic: {}. \
             Include hypothesis, methodology, and possible outcomes.",
            topic
        )
    }

    /// Generate an experiment for `topic`. Repeating the same topic with the
    /// same budget returns the stored outline instead of calling the model.
    pub async fn generate(
        session: &mut SessionContext,
        models: &ModelEndpoints,
        topic: &str,
    ) -> AppResult<ExperimentOutline> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::InvalidRequest("Experiment topic must not be empty".to_string()));
        }

        let budget = session.token_budget();
        if let Some(cached) = session
            .experiment
            .as_ref()
            .filter(|e| e.topic == topic && e.token_budget == budget)
        {
            info!(session_id = %session.id(), topic = %topic, "Reusing cached experiment");
            return Ok(ExperimentOutline {
                experiment: cached.clone(),
                cached: true,
            });
        }

        info!(topic = %topic, budget, "Generating hypothetical experiment");

        let text = models
            .complete_deep(vec![LLMMessage::user(Self::create_prompt(topic))], budget)
            .await?;

        let experiment = CachedExperiment {
            topic: topic.to_string(),
            token_budget: budget,
            text,
        };
        session.experiment = Some(experiment.clone());

        Ok(ExperimentOutline {
            experiment,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedAdapter;
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn test_prompt_mentions_sections() {
        let prompt = HypothesisAgent::create_prompt("soil microbiome");
        assert_eq!(
            prompt,
            "Create a hypothetical experiment on the following topic: soil microbiome. \
             Include hypothesis, methodology, and possible outcomes."
        );
    }

    #[tokio::test]
    async fn test_generate_uses_deep_model_with_budget() {
        let adapter = Arc::new(ScriptedAdapter::replying("Hypothesis: ..."));
        let models = ModelEndpoints::new(adapter.clone(), "gpt-4o-mini", "o1-mini");
        let mut session = SessionContext::new(Uuid::new_v4());
        session.set_token_budget(3000).unwrap();

        let outline = HypothesisAgent::generate(&mut session, &models, "  CRISPR in wheat ").await.unwrap();

        assert!(!outline.cached);
        assert_eq!(outline.experiment.topic, "CRISPR in wheat");
        assert_eq!(outline.experiment.text, "Hypothesis: ...");

        let requests = adapter.requests();
        assert_eq!(requests[0].model, "o1-mini");
        assert_eq!(requests[0].max_tokens, Some(3000));
    }

    #[tokio::test]
    async fn test_same_topic_served_from_cache() {
        let adapter = Arc::new(ScriptedAdapter::replying("outline"));
        let models = ModelEndpoints::new(adapter.clone(), "gpt-4o-mini", "o1-mini");
        let mut session = SessionContext::new(Uuid::new_v4());

        HypothesisAgent::generate(&mut session, &models, "photosynthesis").await.unwrap();
        let again = HypothesisAgent::generate(&mut session, &models, "photosynthesis").await.unwrap();

        assert!(again.cached);
        assert_eq!(again.experiment.text, "outline");
        assert_eq!(adapter.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_new_topic_or_budget_regenerates() {
        let adapter = Arc::new(ScriptedAdapter::replying("outline"));
        let models = ModelEndpoints::new(adapter.clone(), "gpt-4o-mini", "o1-mini");
        let mut session = SessionContext::new(Uuid::new_v4());

        HypothesisAgent::generate(&mut session, &models, "photosynthesis").await.unwrap();
        HypothesisAgent::generate(&mut session, &models, "superconductors").await.unwrap();
        session.set_token_budget(9000).unwrap();
        HypothesisAgent::generate(&mut session, &models, "superconductors").await.unwrap();

        assert_eq!(adapter.requests().len(), 3);
        assert_eq!(session.experiment.unwrap().token_budget, 9000);
    }

    #[tokio::test]
    async fn test_empty_topic_rejected() {
        let adapter = Arc::new(ScriptedAdapter::replying("outline"));
        let models = ModelEndpoints::new(adapter.clone(), "gpt-4o-mini", "o1-mini");
        let mut session = SessionContext::new(Uuid::new_v4());

        assert!(HypothesisAgent::generate(&mut session, &models, "").await.is_err());
        assert!(adapter.requests().is_empty());
    }
}

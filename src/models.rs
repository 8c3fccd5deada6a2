use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::documents::{PdfTextExtractor, TextExtractor};
use crate::llm::ModelEndpoints;
use crate::search::{ArxivClient, PaperSearch, SearchResult, SortBy, DEFAULT_RESULTS};
use crate::session::SessionStore;
use crate::types::LLMMessage;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub models: ModelEndpoints,
    pub search: Arc<dyn PaperSearch>,
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let search = ArxivClient::from_config(&config.search)?;
        let models = ModelEndpoints::from_config(&config.llm);

        Ok(Self::new(config, models, Arc::new(search), Arc::new(PdfTextExtractor)))
    }

    pub fn new(
        config: Config,
        models: ModelEndpoints,
        search: Arc<dyn PaperSearch>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session.idle_timeout_secs));
        Self {
            config,
            sessions,
            models,
            search,
            extractor,
        }
    }
}

// API Request/Response types

#[derive(Debug, serde::Serialize)]
pub struct SessionSnapshot {
    pub session_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub token_budget: u32,
    pub min_token_budget: u32,
    pub fast_model: String,
    pub deep_model: String,
    pub search_result_count: usize,
    pub has_pdf_analysis: bool,
    pub has_experiment: bool,
    pub chat_message_count: usize,
}

#[derive(Debug, serde::Deserialize)]
pub struct TokenBudgetRequest {
    pub token_budget: u32,
}

#[derive(Debug, serde::Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub sort_by: SortBy,
}

fn default_max_results() -> usize {
    DEFAULT_RESULTS
}

#[derive(Debug, serde::Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ExperimentRequest {
    pub topic: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct TranscriptResponse {
    pub messages: Vec<LLMMessage>,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub active_sessions: usize,
}

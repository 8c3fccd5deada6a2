//! In-process collaborators for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::documents::TextExtractor;
use crate::llm::LLMAdapter;
use crate::search::{PaperSearch, SearchError, SearchQuery, SearchResult};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};

type Responder = Box<dyn Fn(&LLMRequest) -> AppResult<String> + Send + Sync>;

/// Adapter that answers from a closure and records every request.
pub struct ScriptedAdapter {
    responder: Responder,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedAdapter {
    pub fn new(responder: impl Fn(&LLMRequest) -> AppResult<String> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn failing() -> Self {
        Self::new(|_| Err(AppError::LLMApi("connection refused".to_string())))
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let content = (self.responder)(request)?;
        Ok(LLMResponse {
            content,
            finish_reason: Some("stop".to_string()),
            usage: None,
        })
    }
}

/// Extractor that returns fixed text regardless of input.
pub struct FixedExtractor {
    pub text: String,
    pub calls: Mutex<usize>,
}

impl FixedExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl TextExtractor for FixedExtractor {
    fn extract_text(&self, _data: &[u8]) -> AppResult<String> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.text.clone())
    }
}

/// Search backend serving a canned result list.
pub struct CannedSearch {
    pub results: Vec<SearchResult>,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl CannedSearch {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaperSearch for CannedSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.results.clone())
    }
}

pub fn sample_result(title: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        summary: format!("Summary of {}", title),
        authors: "Ada Lovelace, Alan Turing".to_string(),
        published: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        updated: chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        url: format!("http://arxiv.org/pdf/{}", title.replace(' ', "-")),
    }
}

//! Shared fixtures for the HTTP-level tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use reasoning_lab::documents::TextExtractor;
use reasoning_lab::llm::{LLMAdapter, ModelEndpoints};
use reasoning_lab::search::{PaperSearch, SearchError, SearchQuery, SearchResult};
use reasoning_lab::types::{AppResult, LLMRequest, LLMResponse};
use reasoning_lab::{create_router, AppState, Config};

pub const FAST: &str = "gpt-4o-mini";
pub const DEEP: &str = "o1-mini";

/// Answers routing prompts with `route_to` and everything else with `reply`.
pub struct MockLLM {
    pub route_to: String,
    pub reply: String,
    pub requests: Mutex<Vec<LLMRequest>>,
}

impl MockLLM {
    pub fn new(route_to: &str, reply: &str) -> Self {
        Self {
            route_to: route_to.to_string(),
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests that were not routing classifications.
    pub fn completions(&self) -> Vec<LLMRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !is_routing_call(r))
            .cloned()
            .collect()
    }
}

fn is_routing_call(request: &LLMRequest) -> bool {
    request
        .messages
        .last()
        .map(|m| m.content.contains("Please respond with only"))
        .unwrap_or(false)
}

#[async_trait]
impl LLMAdapter for MockLLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let content = if is_routing_call(request) {
            self.route_to.clone()
        } else {
            self.reply.clone()
        };
        Ok(LLMResponse {
            content,
            finish_reason: Some("stop".to_string()),
            usage: None,
        })
    }
}

pub struct MockSearch {
    pub available: usize,
}

#[async_trait]
impl PaperSearch for MockSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        Ok((0..self.available)
            .map(|i| SearchResult {
                title: format!("{} paper {}", query.query, i + 1),
                summary: "An abstract.".to_string(),
                authors: "Ada Lovelace, Alan Turing".to_string(),
                published: date,
                updated: date,
                url: format!("http://arxiv.org/pdf/2401.0000{}v1", i),
            })
            .collect())
    }
}

pub struct MockExtractor;

impl TextExtractor for MockExtractor {
    fn extract_text(&self, _data: &[u8]) -> AppResult<String> {
        Ok("Extracted paper text about protein folding.".to_string())
    }
}

pub struct TestApp {
    pub router: Router,
    pub llm: Arc<MockLLM>,
}

impl TestApp {
    pub fn new(route_to: &str, reply: &str) -> Self {
        Self::with_config(Config::default(), route_to, reply)
    }

    pub fn with_config(config: Config, route_to: &str, reply: &str) -> Self {
        let llm = Arc::new(MockLLM::new(route_to, reply));
        let models = ModelEndpoints::new(llm.clone(), FAST, DEEP);
        let state = AppState::new(
            config,
            models,
            Arc::new(MockSearch { available: 10 }),
            Arc::new(MockExtractor),
        );
        Self {
            router: create_router(state),
            llm,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn create_session(&self) -> String {
        let response = self
            .send(Request::post("/api/session").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        body["session_id"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, path: &str, session: &str) -> Response<Body> {
        self.send(
            Request::get(path)
                .header("x-session-id", session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn call_json(&self, method: &str, path: &str, session: &str, body: Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(path)
                .header("x-session-id", session)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

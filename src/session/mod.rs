//! Per-session state
//!
//! Every browser session owns one [`SessionContext`], built with its
//! defaults up front and handed to each handler behind an async mutex.
//! Holding that mutex for the whole interaction serializes a session's
//! requests; different sessions never share state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::search::SearchResult;
use crate::types::{AppError, AppResult, LLMMessage, Role};

pub const DEFAULT_TOKEN_BUDGET: u32 = 6000;
pub const MIN_TOKEN_BUDGET: u32 = 1000;
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant";

/// Last PDF summary, keyed by the SHA-256 of the uploaded bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedAnalysis {
    pub document_digest: String,
    pub filename: Option<String>,
    pub summary: String,
}

/// Last generated experiment and the inputs that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedExperiment {
    pub topic: String,
    pub token_budget: u32,
    pub text: String,
}

#[derive(Debug)]
pub struct SessionContext {
    id: Uuid,
    created_at: DateTime<Utc>,
    token_budget: u32,
    // Invariant: transcript[0] is the system message
    transcript: Vec<LLMMessage>,
    pub search_results: Vec<SearchResult>,
    pub pdf_analysis: Option<CachedAnalysis>,
    pub experiment: Option<CachedExperiment>,
}

impl SessionContext {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            token_budget: DEFAULT_TOKEN_BUDGET,
            transcript: vec![LLMMessage::system(SYSTEM_PROMPT)],
            search_results: Vec::new(),
            pdf_analysis: None,
            experiment: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn token_budget(&self) -> u32 {
        self.token_budget
    }

    pub fn set_token_budget(&mut self, budget: u32) -> AppResult<()> {
        if budget < MIN_TOKEN_BUDGET {
            return Err(AppError::InvalidRequest(format!(
                "token budget must be at least {}, got {}",
                MIN_TOKEN_BUDGET, budget
            )));
        }
        debug!(session_id = %self.id, budget, "Token budget updated");
        self.token_budget = budget;
        Ok(())
    }

    /// Full transcript, system message first
    pub fn transcript(&self) -> &[LLMMessage] {
        &self.transcript
    }

    /// Transcript as rendered to the user, without the system message
    pub fn visible_transcript(&self) -> &[LLMMessage] {
        &self.transcript[1..]
    }

    /// Record a completed chat turn.
    pub fn append_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.transcript.push(LLMMessage::new(Role::User, user));
        self.transcript.push(LLMMessage::new(Role::Assistant, assistant));
    }
}

pub type SessionHandle = Arc<Mutex<SessionContext>>;

struct SessionEntry {
    context: SessionHandle,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Start a new session. Idle sessions are dropped on the way in.
    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let context = Arc::new(Mutex::new(SessionContext::new(id)));

        let mut guard = self.inner.write().await;
        let before = guard.len();
        let idle_timeout = self.idle_timeout;
        guard.retain(|_, entry| entry.last_seen.elapsed() < idle_timeout);
        let purged = before - guard.len();
        if purged > 0 {
            info!(purged, "Dropped idle sessions");
        }

        guard.insert(
            id,
            SessionEntry {
                context: context.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session_id = %id, active = guard.len(), "Session created");

        (id, context)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let mut guard = self.inner.write().await;
        guard.get_mut(id).map(|entry| {
            entry.last_seen = Instant::now();
            entry.context.clone()
        })
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        let mut guard = self.inner.write().await;
        let removed = guard.remove(id).is_some();
        if removed {
            info!(session_id = %id, "Session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

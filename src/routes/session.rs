//! Session lifecycle endpoints and the `x-session-id` extractor

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    routing::{post, put},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::models::{AppState, SessionSnapshot, TokenBudgetRequest};
use crate::session::{SessionContext, SessionHandle, MIN_TOKEN_BUDGET};
use crate::types::{AppError, AppJson, AppResult};

pub const SESSION_HEADER: &str = "x-session-id";

/// The session named by the request's `x-session-id` header.
pub struct ActiveSession {
    pub id: Uuid,
    pub handle: SessionHandle,
}

impl FromRequestParts<AppState> for ActiveSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| AppError::InvalidRequest(format!("missing {} header", SESSION_HEADER)))?;

        let id = raw
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| AppError::InvalidRequest(format!("malformed {} header", SESSION_HEADER)))?;

        let handle = state
            .sessions
            .get(&id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))?;

        Ok(Self { id, handle })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/session",
            post(create_session).get(get_session).delete(end_session),
        )
        .route("/api/session/token-budget", put(update_token_budget))
        .with_state(state)
}

pub(crate) fn snapshot(session: &SessionContext, state: &AppState) -> SessionSnapshot {
    SessionSnapshot {
        session_id: session.id(),
        created_at: session.created_at(),
        token_budget: session.token_budget(),
        min_token_budget: MIN_TOKEN_BUDGET,
        fast_model: state.models.fast_model().to_string(),
        deep_model: state.models.deep_model().to_string(),
        search_result_count: session.search_results.len(),
        has_pdf_analysis: session.pdf_analysis.is_some(),
        has_experiment: session.experiment.is_some(),
        chat_message_count: session.visible_transcript().len(),
    }
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSnapshot>) {
    let (_, handle) = state.sessions.create().await;
    let session = handle.lock().await;
    (StatusCode::CREATED, Json(snapshot(&session, &state)))
}

async fn get_session(State(state): State<AppState>, active: ActiveSession) -> Json<SessionSnapshot> {
    let session = active.handle.lock().await;
    Json(snapshot(&session, &state))
}

async fn end_session(State(state): State<AppState>, active: ActiveSession) -> StatusCode {
    state.sessions.remove(&active.id).await;
    StatusCode::NO_CONTENT
}

async fn update_token_budget(
    State(state): State<AppState>,
    active: ActiveSession,
    AppJson(request): AppJson<TokenBudgetRequest>,
) -> AppResult<Json<SessionSnapshot>> {
    let mut session = active.handle.lock().await;
    session.set_token_budget(request.token_budget)?;
    info!(session_id = %active.id, token_budget = request.token_budget, "Token budget changed");
    Ok(Json(snapshot(&session, &state)))
}

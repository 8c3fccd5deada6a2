use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::agents::{ChatAgent, ChatTurn};
use crate::models::{AppState, ChatRequest, TranscriptResponse};
use crate::routes::session::ActiveSession;
use crate::types::{AppJson, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(post_chat).get(get_transcript))
        .with_state(state)
}

async fn post_chat(
    State(state): State<AppState>,
    active: ActiveSession,
    AppJson(request): AppJson<ChatRequest>,
) -> AppResult<Json<ChatTurn>> {
    info!(session_id = %active.id, message_len = request.message.len(), "Received chat message");

    let mut session = active.handle.lock().await;
    let turn = ChatAgent::run_turn(&mut session, &state.models, &request.message).await?;

    Ok(Json(turn))
}

/// Conversation as shown to the user; the system message stays hidden
async fn get_transcript(active: ActiveSession) -> Json<TranscriptResponse> {
    let session = active.handle.lock().await;
    Json(TranscriptResponse {
        messages: session.visible_transcript().to_vec(),
    })
}

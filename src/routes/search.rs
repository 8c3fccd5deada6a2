use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::agents::LiteratureAgent;
use crate::models::{AppState, SearchRequest, SearchResponse};
use crate::routes::session::ActiveSession;
use crate::search::SearchQuery;
use crate::types::{AppJson, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(run_search).get(stored_results))
        .with_state(state)
}

async fn run_search(
    State(state): State<AppState>,
    active: ActiveSession,
    AppJson(request): AppJson<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    info!(session_id = %active.id, query = %request.query, "Search request received");

    let query = SearchQuery::new(&request.query, request.max_results, request.sort_by)?;
    let mut session = active.handle.lock().await;
    let results = LiteratureAgent::search(&mut session, state.search.as_ref(), &query).await?;

    Ok(Json(SearchResponse { results }))
}

/// Results of the last search, without contacting the search service
async fn stored_results(active: ActiveSession) -> Json<SearchResponse> {
    let session = active.handle.lock().await;
    Json(SearchResponse {
        results: session.search_results.clone(),
    })
}

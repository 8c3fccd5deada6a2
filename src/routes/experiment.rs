use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::agents::{ExperimentOutline, HypothesisAgent};
use crate::models::{AppState, ExperimentRequest};
use crate::routes::session::ActiveSession;
use crate::types::{AppJson, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/experiment", post(generate_experiment).get(cached_experiment))
        .with_state(state)
}

async fn generate_experiment(
    State(state): State<AppState>,
    active: ActiveSession,
    AppJson(request): AppJson<ExperimentRequest>,
) -> AppResult<Json<ExperimentOutline>> {
    info!(session_id = %active.id, topic = %request.topic, "Experiment request received");

    let mut session = active.handle.lock().await;
    let outline = HypothesisAgent::generate(&mut session, &state.models, &request.topic).await?;

    Ok(Json(outline))
}

async fn cached_experiment(active: ActiveSession) -> Json<Option<ExperimentOutline>> {
    let session = active.handle.lock().await;
    Json(session.experiment.clone().map(|experiment| ExperimentOutline {
        experiment,
        cached: true,
    }))
}

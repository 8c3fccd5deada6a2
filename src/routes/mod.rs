//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/session` - Session lifecycle and token budget
//! - `/api/search` - arXiv search
//! - `/api/pdf` - PDF upload and analysis
//! - `/api/experiment` - Hypothetical experiment generation
//! - `/api/chat` - Model-routed chat
//! - `/api/health` - Health checks
//! - `/` - Single-page UI
//!
//! Every mode endpoint identifies its session through the `x-session-id`
//! header; see [`session::ActiveSession`].

pub mod chat;
pub mod experiment;
pub mod health;
pub mod pdf;
pub mod search;
pub mod session;
pub mod ui;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    let api_router = Router::new()
        .merge(session::router(state.clone()))
        .merge(search::router(state.clone()))
        .merge(pdf::router(state.clone()))
        .merge(experiment::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(health::router(state));

    Router::new()
        .merge(api_router)
        .merge(ui::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

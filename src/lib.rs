// Reasoning-lab - arXiv search, PDF summaries, hypothetical experiments and model-routed chat

pub mod agents;
pub mod config;
pub mod documents;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod session;
pub mod types;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}

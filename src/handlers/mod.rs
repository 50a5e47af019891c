pub mod dictionary;
pub mod error_responses;
pub mod search;
pub mod setup;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::watch;
use tower_http::cors::CorsLayer;

use crate::data::models::SetupStatus;
use crate::data::repositories::SqliteStore;
use crate::features::search::SearchCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub search: Arc<SearchCoordinator<SqliteStore>>,
    pub setup: watch::Receiver<SetupStatus>,
    /// Cap on entries returned by one search response.
    pub max_results: usize,
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search::search_api))
        .route("/search/latest", get(search::latest_search))
        .route("/entries/{id}", get(dictionary::get_entry))
        .route("/radicals", get(dictionary::list_radicals))
        .route("/stats", get(dictionary::stats))
        .route("/setup", get(setup::setup_status))
        .with_state(state)
}

/// The whole HTTP surface, rooted at `/api`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router(state))
        .layer(CorsLayer::permissive())
}

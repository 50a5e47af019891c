use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::data::models::{ApiError, EntryWithPronunciations, StatsResponse};
use crate::data::repositories::DictionaryQueries;
use crate::handlers::AppState;

pub async fn get_entry(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<EntryWithPronunciations>, ApiError> {
    let store = Arc::clone(&state.store);
    let entry = tokio::task::spawn_blocking(move || store.get_by_id(id)).await??;

    entry.map(Json).ok_or(ApiError::NotFound(id))
}

pub async fn list_radicals(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let store = Arc::clone(&state.store);
    let radicals = tokio::task::spawn_blocking(move || store.distinct_radicals()).await??;
    Ok(Json(radicals))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let store = Arc::clone(&state.store);
    let count = tokio::task::spawn_blocking(move || store.count()).await??;
    Ok(Json(StatsResponse { count }))
}

use axum::{
    extract::{Query, State},
    Json,
};

use crate::data::models::{ApiError, SearchMode, SearchParams, SearchResponse};
use crate::handlers::AppState;

// A missing or blank mode means term search; anything unrecognised yields no results.
fn requested_mode(raw: Option<&str>) -> Option<SearchMode> {
    match raw.map(str::trim).filter(|m| !m.is_empty()) {
        None => Some(SearchMode::Term),
        Some(raw) => SearchMode::parse(raw),
    }
}

pub async fn search_api(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, ApiError> {
    let mode = requested_mode(params.mode.as_deref());
    let outcome = state.search.submit(params.q.clone(), mode).await?;

    let results = outcome
        .results
        .iter()
        .take(state.max_results)
        .cloned()
        .collect();

    Ok(Json(SearchResponse {
        query: params.q,
        mode,
        seq: outcome.seq,
        superseded: outcome.superseded,
        results,
    }))
}

/// The newest search published so far, whoever asked for it.
pub async fn latest_search(State(state): State<AppState>) -> Json<SearchResponse> {
    let latest = state.search.latest();

    Json(SearchResponse {
        query: latest.query,
        mode: latest.mode,
        seq: latest.seq,
        superseded: false,
        results: latest
            .results
            .iter()
            .take(state.max_results)
            .cloned()
            .collect(),
    })
}

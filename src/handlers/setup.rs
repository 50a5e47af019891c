use axum::{extract::State, Json};

use crate::data::models::SetupStatus;
use crate::handlers::AppState;

pub async fn setup_status(State(state): State<AppState>) -> Json<SetupStatus> {
    Json(state.setup.borrow().clone())
}

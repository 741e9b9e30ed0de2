use axum::{extract::State, Json};
use shared::contracts::{Jackpot, Winner};

use crate::{domain::SnapshotResponse, state::AppState};

pub async fn jackpots(State(state): State<AppState>) -> Json<SnapshotResponse<Jackpot>> {
    Json(state.widgets.jackpots.get().await.into())
}

pub async fn winners(State(state): State<AppState>) -> Json<SnapshotResponse<Winner>> {
    Json(state.widgets.winners.get().await.into())
}

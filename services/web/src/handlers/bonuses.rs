use axum::{extract::State, Json};
use shared::contracts::ActiveBonus;

use crate::{domain::SnapshotResponse, extractors::CurrentSession, state::AppState};

/// Latest active-bonus snapshot for the session
pub async fn active(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<SnapshotResponse<ActiveBonus>> {
    Json(state.sessions.active_bonuses(session.id).await.into())
}

use axum::{extract::State, Json};
use shared::progress::{wager_progress, TierProgress, WagerProgress};

use crate::{errors::Result, extractors::CurrentSession, state::AppState};

/// Wagering progress of every bonus that reports it
///
/// Reads the polled snapshot; before the first poll lands it asks upstream directly.
pub async fn wager(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<WagerProgress>>> {
    let progress = match state.sessions.active_bonuses(session.id).await {
        Some(snapshot) => wager_progress(&snapshot.data),
        None => wager_progress(&state.api.active_bonuses(&session.token).await?),
    };
    Ok(Json(progress))
}

pub async fn vip(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<TierProgress>> {
    let status = state.api.vip_status(&session.token).await?;
    Ok(Json(TierProgress::from(&status)))
}

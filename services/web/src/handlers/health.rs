use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn detailed_health(State(state): State<AppState>) -> Json<Value> {
    let jackpots = state.widgets.jackpots.get().await.map(|s| s.fetched_at);
    let winners = state.widgets.winners.get().await.map(|s| s.fetched_at);
    let sessions = state.sessions.len().await;

    // Widgets that never loaded mean the upstream has been unreachable since startup
    let healthy = jackpots.is_some() && winners.is_some();

    Json(json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "active_sessions": sessions,
        "components": {
            "jackpots": jackpots.map(|t| t.to_rfc3339()),
            "recent_winners": winners.map(|t| t.to_rfc3339()),
        }
    }))
}

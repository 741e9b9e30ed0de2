use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    domain::{LoginRequest, SessionResponse},
    errors::Result,
    extractors::{CurrentSession, ValidatedJson},
    session::Session,
    state::AppState,
};

fn session_response(session: Session) -> SessionResponse {
    SessionResponse {
        session_id: session.id,
        profile: session.profile,
        refreshed_at: session.refreshed_at,
    }
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state.sessions.login(req.token).await?;
    metrics::counter!("logins_total").increment(1);
    Ok(Json(session_response(session)))
}

pub async fn current(CurrentSession(session): CurrentSession) -> Json<SessionResponse> {
    Json(session_response(session))
}

pub async fn refresh(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<SessionResponse>> {
    let session = state.sessions.refresh(session.id).await?;
    Ok(Json(session_response(session)))
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<Value> {
    let closed = state.sessions.logout(session.id).await;
    Json(json!({ "success": closed }))
}

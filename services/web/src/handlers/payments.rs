use axum::{extract::State, Json};
use shared::types::PaymentMethod;

use crate::{errors::Result, extractors::CurrentSession, state::AppState};

pub async fn list_methods(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<PaymentMethod>>> {
    let methods = state.api.payment_methods(&session.token).await?;
    Ok(Json(methods))
}

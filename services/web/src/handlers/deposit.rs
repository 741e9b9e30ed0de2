use axum::{extract::State, Json};
use shared::calculator::{preview_deposit, validate_submission, DepositPreview};
use shared::contracts::{ActivateDepositRequest, BonusActivation, DepositReceipt, DepositRequest};
use shared::reconcile::reconcile;
use tracing::Instrument;

use crate::{
    domain::{DepositForm, DepositResponse, PreviewRequest, PreviewResponse},
    errors::{AppError, Result},
    extractors::{CurrentSession, ValidatedJson},
    session::Session,
    state::AppState,
};

/// Live estimate for the deposit form
///
/// Anonymous visitors get a preview without any offer.
pub async fn preview(
    State(state): State<AppState>,
    session: Option<CurrentSession>,
    ValidatedJson(req): ValidatedJson<PreviewRequest>,
) -> Json<PreviewResponse> {
    let offer = match &session {
        Some(CurrentSession(session)) => state.sessions.current_offer(session).await,
        None => None,
    };

    let preview = preview_deposit(req.amount, offer.as_ref(), req.accept_bonus);
    metrics::counter!("deposit_previews_total").increment(1);

    Json(PreviewResponse { preview, offer })
}

/// Validate, submit and reconcile a deposit
pub async fn create_deposit(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(form): ValidatedJson<DepositForm>,
) -> Result<Json<DepositResponse>> {
    let span = tracing::info_span!(
        "create_deposit",
        session_id = %session.id,
        deposit.amount = %form.amount,
        deposit.payment_method = %form.payment_method,
        deposit.accept_bonus = form.accept_bonus
    );

    submit_deposit(state, session, form).instrument(span).await
}

async fn submit_deposit(
    state: AppState,
    session: Session,
    form: DepositForm,
) -> Result<Json<DepositResponse>> {
    let offer = state.sessions.current_offer(&session).await;
    let methods = state.api.payment_methods(&session.token).await?;

    let method = validate_submission(
        form.amount,
        &methods,
        &form.payment_method,
        offer.as_ref(),
        form.accept_bonus,
    )
    .map_err(|rejection| {
        metrics::counter!("deposit_rejections_total", "reason" => rejection.reason()).increment(1);
        AppError::from(rejection)
    })?;

    let preview = preview_deposit(form.amount, offer.as_ref(), form.accept_bonus);

    let submitted = activate_and_deposit(&state, &session, &form, &method.id, &preview).await;

    // Upstream bonus state may have changed even if a later step failed
    state.sessions.refresh_bonuses(session.id).await;

    let (activation, receipt) = submitted?;
    metrics::counter!("deposits_submitted_total").increment(1);

    let reconciliation = reconcile(preview, activation);
    if reconciliation.diverged {
        tracing::warn!(
            preview_bonus = %reconciliation.preview.bonus_amount,
            granted_bonus = %reconciliation.authoritative.bonus_amount,
            preview_wager = %reconciliation.preview.wager_required,
            granted_wager = %reconciliation.authoritative.wager_required,
            bonus_delta = reconciliation.bonus_delta(),
            "Bonus preview diverged from server grant"
        );
        metrics::counter!("bonus_preview_divergence_total").increment(1);
    }

    tracing::info!(
        has_bonus = reconciliation.authoritative.has_bonus,
        redirect = receipt.redirect_url.is_some(),
        "Deposit submitted"
    );

    Ok(Json(DepositResponse::new(
        reconciliation,
        receipt.redirect_url,
        receipt.transaction,
    )))
}

/// Activate the bonus (when the preview carries one), then create the deposit
async fn activate_and_deposit(
    state: &AppState,
    session: &Session,
    form: &DepositForm,
    method_id: &str,
    preview: &DepositPreview,
) -> Result<(BonusActivation, DepositReceipt)> {
    let activation = if preview.has_bonus() {
        state
            .api
            .activate_deposit_bonus(
                &session.token,
                &ActivateDepositRequest {
                    deposit_amount: form.amount,
                    payment_method: method_id.to_string(),
                },
            )
            .await?
    } else {
        BonusActivation::none()
    };

    let currency = form
        .currency
        .clone()
        .unwrap_or_else(|| state.config.deposit.default_currency.clone())
        .to_uppercase();

    let receipt = state
        .api
        .create_deposit(
            &session.token,
            &DepositRequest {
                amount: form.amount,
                payment_method: method_id.to_string(),
                currency,
            },
        )
        .await?;

    Ok((activation, receipt))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use shared::calculator::DepositPreview;
use shared::contracts::{BonusActivation, UserProfile};
use shared::reconcile::Reconciliation;
use shared::types::{Amount, BonusOffer};
use uuid::Uuid;
use validator::Validate;

use crate::poller::Snapshot;

// The deposit field is free text in the browser; numbers are accepted too.
// Anything unparseable reads as zero and is caught by deposit validation.
fn deserialize_amount_input<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(value)) => Amount::new(value).unwrap_or(Amount::ZERO),
        Some(RawAmount::Text(text)) => Amount::from_input(&text),
        None => Amount::ZERO,
    })
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Token must not be empty"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub profile: UserProfile,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default, deserialize_with = "deserialize_amount_input")]
    pub amount: Amount,
    #[serde(default)]
    pub accept_bonus: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub preview: DepositPreview,
    /// Offer the preview was computed against, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<BonusOffer>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepositForm {
    #[serde(default, deserialize_with = "deserialize_amount_input")]
    pub amount: Amount,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub accept_bonus: bool,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub preview: DepositPreview,
    pub authoritative: BonusActivation,
    pub diverged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<serde_json::Value>,
}

impl DepositResponse {
    pub fn new(
        reconciliation: Reconciliation,
        redirect_url: Option<String>,
        transaction: Option<serde_json::Value>,
    ) -> Self {
        Self {
            preview: reconciliation.preview,
            authoritative: reconciliation.authoritative,
            diverged: reconciliation.diverged,
            redirect_url,
            transaction,
        }
    }
}

/// Polled data as served to the browser
///
/// `fetchedAt` is null until the first successful fetch; the list is then empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse<T> {
    pub data: Vec<T>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> From<Option<Snapshot<Vec<T>>>> for SnapshotResponse<T> {
    fn from(snapshot: Option<Snapshot<Vec<T>>>) -> Self {
        match snapshot {
            Some(snapshot) => Self {
                data: snapshot.data,
                fetched_at: Some(snapshot.fetched_at),
            },
            None => Self {
                data: Vec::new(),
                fetched_at: None,
            },
        }
    }
}

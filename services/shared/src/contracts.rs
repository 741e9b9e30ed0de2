//! Wire contracts of the upstream casino API
//!
//! Every upstream response is wrapped in `{ success, data?, message? }`.
//! Field names are camelCase on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::constants::OFFERABLE_BONUS_STATUSES;
use crate::types::{Amount, BonusOffer};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    #[error("upstream rejected the request: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    #[error("upstream reported success without data")]
    MissingData,
}

/// Response envelope shared by all upstream endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` into an error
    pub fn into_data(self) -> Result<T, EnvelopeError> {
        if !self.success {
            return Err(EnvelopeError::Rejected(self.message));
        }
        self.data.ok_or(EnvelopeError::MissingData)
    }
}

// Upstream ids are numeric on some endpoints and strings on others
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Row of `GET /api/bonuses/active`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBonus {
    #[serde(deserialize_with = "deserialize_id")]
    pub bonus_id: String,
    pub bonus_name: String,
    pub percent: f64,
    pub max_bonus: Amount,
    pub min_deposit: Amount,
    /// Wager multiplier
    pub wagering: f64,
    #[serde(default)]
    pub freespins: u32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wager_required: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wagered: Option<Amount>,
}

impl ActiveBonus {
    pub fn to_offer(&self) -> BonusOffer {
        BonusOffer {
            percent: self.percent,
            max_bonus: self.max_bonus,
            min_deposit: self.min_deposit,
            wager_multiplier: self.wagering,
        }
    }

    /// Whether this bonus can still be attached to a new deposit
    pub fn is_offerable(&self) -> bool {
        OFFERABLE_BONUS_STATUSES
            .iter()
            .any(|status| self.status.eq_ignore_ascii_case(status))
    }
}

/// Pick the offer presented next to the deposit form
pub fn select_offer(bonuses: &[ActiveBonus]) -> Option<BonusOffer> {
    bonuses
        .iter()
        .find(|bonus| bonus.is_offerable())
        .map(ActiveBonus::to_offer)
}

/// Body of `POST /api/bonuses/activate-deposit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateDepositRequest {
    pub deposit_amount: Amount,
    pub payment_method: String,
}

/// Authoritative bonus grant returned by the bonus engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusActivation {
    pub has_bonus: bool,
    #[serde(default)]
    pub bonus_amount: Amount,
    #[serde(default)]
    pub wager_required: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BonusActivation {
    /// Grant for a deposit made without a bonus
    pub fn none() -> Self {
        Self {
            has_bonus: false,
            bonus_amount: Amount::ZERO,
            wager_required: Amount::ZERO,
            message: None,
        }
    }
}

/// Body of `POST /api/payments/deposit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub amount: Amount,
    pub payment_method: String,
    pub currency: String,
}

/// Payload of `POST /api/payments/deposit`
///
/// Either a redirect to the payment gateway or an already-created transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<serde_json::Value>,
}

/// Payload of `GET /api/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip_level: Option<String>,
}

/// Payload of `POST /api/auth/refresh`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRefresh {
    pub token: String,
}

/// Row of `GET /api/jackpots`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Jackpot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Row of `GET /api/games/recent-winners`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    #[serde(alias = "username")]
    pub player: String,
    pub game: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Payload of `GET /api/vip/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipStatus {
    pub level: String,
    pub points: f64,
    /// Points at which the current level starts
    #[serde(default)]
    pub current_level_points: f64,
    /// None at the top tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_level_points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_level: Option<String>,
}

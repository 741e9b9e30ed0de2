//! Upstream casino API
//!
//! Everything authoritative (auth, bonuses, payments, jackpots, VIP) lives
//! behind this trait. The HTTP implementation talks to the real API; tests
//! swap in an in-memory one.

mod http;

pub use http::HttpCasinoApi;

use async_trait::async_trait;
use shared::contracts::{
    ActivateDepositRequest, ActiveBonus, BonusActivation, DepositReceipt, DepositRequest,
    EnvelopeError, Jackpot, UserProfile, VipStatus, Winner,
};
use shared::errors::ServiceError;
use shared::types::PaymentMethod;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("upstream timed out: {0}")]
    Timeout(String),

    #[error("upstream rejected the token")]
    Unauthorized,

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream rejected the request: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl From<EnvelopeError> for ApiError {
    fn from(error: EnvelopeError) -> Self {
        match error {
            EnvelopeError::Rejected(message) => ApiError::Rejected(message),
            EnvelopeError::MissingData => ApiError::InvalidResponse(error.to_string()),
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unavailable(detail) => ServiceError::upstream_unavailable(detail),
            ApiError::Timeout(detail) => ServiceError::upstream_timeout(detail),
            ApiError::Unauthorized => ServiceError::token_rejected(),
            ApiError::Status { status, body } => ServiceError::upstream_bad_status(status, body),
            ApiError::Rejected(message) => ServiceError::upstream_rejected(message),
            ApiError::InvalidResponse(detail) => ServiceError::upstream_invalid_response(detail),
        }
    }
}

#[async_trait]
pub trait CasinoApi: Send + Sync {
    /// `GET /api/auth/me`
    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError>;

    /// `POST /api/auth/refresh`, returns the new token
    async fn refresh_token(&self, token: &str) -> Result<String, ApiError>;

    /// `GET /api/bonuses/active`
    async fn active_bonuses(&self, token: &str) -> Result<Vec<ActiveBonus>, ApiError>;

    /// `POST /api/bonuses/activate-deposit`
    async fn activate_deposit_bonus(
        &self,
        token: &str,
        req: &ActivateDepositRequest,
    ) -> Result<BonusActivation, ApiError>;

    /// `POST /api/payments/deposit`
    async fn create_deposit(
        &self,
        token: &str,
        req: &DepositRequest,
    ) -> Result<DepositReceipt, ApiError>;

    /// `GET /api/payments/methods`
    async fn payment_methods(&self, token: &str) -> Result<Vec<PaymentMethod>, ApiError>;

    /// `GET /api/vip/status`
    async fn vip_status(&self, token: &str) -> Result<VipStatus, ApiError>;

    /// `GET /api/jackpots`
    async fn jackpots(&self) -> Result<Vec<Jackpot>, ApiError>;

    /// `GET /api/games/recent-winners`
    async fn recent_winners(&self) -> Result<Vec<Winner>, ApiError>;
}

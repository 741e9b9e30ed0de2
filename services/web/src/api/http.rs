//! HTTP client for the upstream casino API
//!
//! Calls are made once. Pollers re-fetch on their own schedule; deposit calls
//! are never replayed.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::contracts::{
    ActivateDepositRequest, ActiveBonus, ApiEnvelope, BonusActivation, DepositReceipt,
    DepositRequest, Jackpot, TokenRefresh, UserProfile, VipStatus, Winner,
};
use shared::types::PaymentMethod;
use std::time::Duration;
use tracing::debug;

use super::{ApiError, CasinoApi};

/// Longest upstream error body kept for logs
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Clone)]
pub struct HttpCasinoApi {
    http: Client,
    base_url: String,
}

impl HttpCasinoApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Some endpoints reject with a 4xx and a normal envelope
            if status.is_client_error() {
                if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body) {
                    return Err(ApiError::Rejected(envelope.message));
                }
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(envelope.into_data()?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET upstream");
        self.send(self.http.get(url), token).await
    }

    async fn post<B, T>(&self, path: &str, token: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "POST upstream");
        self.send(self.http.post(url).json(body), Some(token)).await
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(error.to_string())
    } else if error.is_decode() {
        ApiError::InvalidResponse(error.to_string())
    } else {
        ApiError::Unavailable(error.to_string())
    }
}

#[async_trait]
impl CasinoApi for HttpCasinoApi {
    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.get("/api/auth/me", Some(token)).await
    }

    async fn refresh_token(&self, token: &str) -> Result<String, ApiError> {
        let refreshed: TokenRefresh = self
            .post("/api/auth/refresh", token, &serde_json::json!({}))
            .await?;
        Ok(refreshed.token)
    }

    async fn active_bonuses(&self, token: &str) -> Result<Vec<ActiveBonus>, ApiError> {
        self.get("/api/bonuses/active", Some(token)).await
    }

    async fn activate_deposit_bonus(
        &self,
        token: &str,
        req: &ActivateDepositRequest,
    ) -> Result<BonusActivation, ApiError> {
        self.post("/api/bonuses/activate-deposit", token, req).await
    }

    async fn create_deposit(
        &self,
        token: &str,
        req: &DepositRequest,
    ) -> Result<DepositReceipt, ApiError> {
        self.post("/api/payments/deposit", token, req).await
    }

    async fn payment_methods(&self, token: &str) -> Result<Vec<PaymentMethod>, ApiError> {
        self.get("/api/payments/methods", Some(token)).await
    }

    async fn vip_status(&self, token: &str) -> Result<VipStatus, ApiError> {
        self.get("/api/vip/status", Some(token)).await
    }

    async fn jackpots(&self) -> Result<Vec<Jackpot>, ApiError> {
        self.get("/api/jackpots", None).await
    }

    async fn recent_winners(&self) -> Result<Vec<Winner>, ApiError> {
        self.get("/api/games/recent-winners", None).await
    }
}

//! Common test utilities and fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use shared::constants::SESSION_HEADER;
use shared::contracts::{
    ActivateDepositRequest, ActiveBonus, BonusActivation, DepositReceipt, DepositRequest, Jackpot,
    UserProfile, VipStatus, Winner,
};
use shared::types::PaymentMethod;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use web::api::{ApiError, CasinoApi};
use web::config::{Config, DepositConfig, PollingConfig, SessionConfig, UpstreamConfig};
use web::state::AppState;

pub const VALID_TOKEN: &str = "valid-token";
pub const REFRESHED_TOKEN: &str = "refreshed-token";

/// Scripted upstream responses
pub struct MockResponses {
    pub active_bonuses: Result<Vec<ActiveBonus>, ApiError>,
    pub activation: Result<BonusActivation, ApiError>,
    pub deposit: Result<DepositReceipt, ApiError>,
    pub payment_methods: Result<Vec<PaymentMethod>, ApiError>,
    pub refresh: Result<String, ApiError>,
    pub vip: Result<VipStatus, ApiError>,
    pub jackpots: Result<Vec<Jackpot>, ApiError>,
    pub winners: Result<Vec<Winner>, ApiError>,
}

impl Default for MockResponses {
    fn default() -> Self {
        Self {
            active_bonuses: Ok(Vec::new()),
            activation: Ok(BonusActivation::none()),
            deposit: Ok(DepositReceipt {
                redirect_url: Some("https://pay.example/checkout/1".to_string()),
                transaction: None,
            }),
            payment_methods: Ok(vec![card(), crypto()]),
            refresh: Ok(REFRESHED_TOKEN.to_string()),
            vip: Ok(serde_json::from_value(json!({
                "level": "Silver",
                "points": 1500.0,
                "currentLevelPoints": 1000.0,
                "nextLevelPoints": 3000.0,
                "nextLevel": "Gold"
            }))
            .unwrap()),
            jackpots: Ok(Vec::new()),
            winners: Ok(Vec::new()),
        }
    }
}

/// Recorded upstream traffic
#[derive(Default)]
pub struct MockCalls {
    pub activations: Vec<ActivateDepositRequest>,
    pub deposits: Vec<DepositRequest>,
    pub tokens: Vec<String>,
    pub bonus_fetches: usize,
}

/// In-memory stand-in for the casino API
#[derive(Default)]
pub struct MockCasinoApi {
    pub responses: Mutex<MockResponses>,
    pub calls: Mutex<MockCalls>,
}

impl MockCasinoApi {
    pub fn set(&self, update: impl FnOnce(&mut MockResponses)) {
        update(&mut self.responses.lock().unwrap());
    }

    pub fn activations(&self) -> Vec<ActivateDepositRequest> {
        self.calls.lock().unwrap().activations.clone()
    }

    pub fn deposits(&self) -> Vec<DepositRequest> {
        self.calls.lock().unwrap().deposits.clone()
    }

    pub fn bonus_fetches(&self) -> usize {
        self.calls.lock().unwrap().bonus_fetches
    }

    fn authorize(&self, token: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().tokens.push(token.to_string());
        if token == VALID_TOKEN || token == REFRESHED_TOKEN {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

#[async_trait]
impl CasinoApi for MockCasinoApi {
    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.authorize(token)?;
        Ok(UserProfile {
            id: "42".to_string(),
            username: "player42".to_string(),
            email: Some("player42@example.com".to_string()),
            balance: None,
            currency: Some("RUB".to_string()),
            vip_level: Some("Silver".to_string()),
        })
    }

    async fn refresh_token(&self, token: &str) -> Result<String, ApiError> {
        self.authorize(token)?;
        self.responses.lock().unwrap().refresh.clone()
    }

    async fn active_bonuses(&self, token: &str) -> Result<Vec<ActiveBonus>, ApiError> {
        self.authorize(token)?;
        self.calls.lock().unwrap().bonus_fetches += 1;
        self.responses.lock().unwrap().active_bonuses.clone()
    }

    async fn activate_deposit_bonus(
        &self,
        token: &str,
        req: &ActivateDepositRequest,
    ) -> Result<BonusActivation, ApiError> {
        self.authorize(token)?;
        self.calls.lock().unwrap().activations.push(req.clone());
        self.responses.lock().unwrap().activation.clone()
    }

    async fn create_deposit(
        &self,
        token: &str,
        req: &DepositRequest,
    ) -> Result<DepositReceipt, ApiError> {
        self.authorize(token)?;
        self.calls.lock().unwrap().deposits.push(req.clone());
        self.responses.lock().unwrap().deposit.clone()
    }

    async fn payment_methods(&self, token: &str) -> Result<Vec<PaymentMethod>, ApiError> {
        self.authorize(token)?;
        self.responses.lock().unwrap().payment_methods.clone()
    }

    async fn vip_status(&self, token: &str) -> Result<VipStatus, ApiError> {
        self.authorize(token)?;
        self.responses.lock().unwrap().vip.clone()
    }

    async fn jackpots(&self) -> Result<Vec<Jackpot>, ApiError> {
        self.responses.lock().unwrap().jackpots.clone()
    }

    async fn recent_winners(&self) -> Result<Vec<Winner>, ApiError> {
        self.responses.lock().unwrap().winners.clone()
    }
}

pub fn card() -> PaymentMethod {
    serde_json::from_value(json!({
        "id": "card",
        "name": "Bank card",
        "minDeposit": 100,
        "maxDeposit": 300000,
        "currencies": ["RUB"]
    }))
    .unwrap()
}

pub fn crypto() -> PaymentMethod {
    serde_json::from_value(json!({
        "id": "usdt",
        "name": "USDT",
        "minDeposit": 1000
    }))
    .unwrap()
}

/// Welcome offer used across scenarios: 100% up to 70 000, from 500, x35
pub fn welcome_bonus() -> ActiveBonus {
    serde_json::from_value(json!({
        "bonusId": 1,
        "bonusName": "Welcome",
        "percent": 100,
        "maxBonus": 70000,
        "minDeposit": 500,
        "wagering": 35,
        "status": "available"
    }))
    .unwrap()
}

pub fn test_config() -> Config {
    Config {
        api_port: 0,
        metrics_port: 0,
        upstream: UpstreamConfig {
            base_url: "http://upstream.test".to_string(),
            timeout_secs: 1,
        },
        polling: PollingConfig {
            jackpot_interval_secs: 60,
            winners_interval_secs: 60,
            bonus_interval_secs: 60,
        },
        deposit: DepositConfig {
            default_currency: "RUB".to_string(),
        },
        session: SessionConfig {
            idle_ttl_secs: 600,
            sweep_interval_secs: 60,
        },
        cors_allow_any: true,
    }
}

/// Router wired to a mock upstream, served in-process
pub struct TestContext {
    pub server: TestServer,
    pub api: Arc<MockCasinoApi>,
    pub state: AppState,
    pub shutdown: CancellationToken,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_api(MockCasinoApi::default())
    }

    pub fn with_api(api: MockCasinoApi) -> Self {
        let api = Arc::new(api);
        let shutdown = CancellationToken::new();
        let state = AppState::new(test_config(), api.clone(), &shutdown);
        let server = TestServer::new(web::build_router(state.clone()))
            .expect("Failed to start test server");

        Self {
            server,
            api,
            state,
            shutdown,
        }
    }

    /// Log in with the valid token and return the session id
    pub async fn login(&self) -> String {
        let response = self
            .server
            .post("/session")
            .json(&json!({ "token": VALID_TOKEN }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK, "login failed: {}", response.text());

        let body: Value = response.json();
        body["sessionId"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, path: &str, session: &str) -> TestResponse {
        self.server
            .get(path)
            .add_header(session_header(), session_value(session))
            .await
    }

    pub async fn post(&self, path: &str, session: &str, body: Value) -> TestResponse {
        self.server
            .post(path)
            .add_header(session_header(), session_value(session))
            .json(&body)
            .await
    }

    pub async fn delete(&self, path: &str, session: &str) -> TestResponse {
        self.server
            .delete(path)
            .add_header(session_header(), session_value(session))
            .await
    }
}

/// Poll `condition` for up to a second
pub async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if condition().await {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn session_header() -> HeaderName {
    HeaderName::from_static(SESSION_HEADER)
}

fn session_value(session: &str) -> HeaderValue {
    HeaderValue::from_str(session).expect("Invalid session header value")
}

/// Helper function to parse error response
pub fn parse_error(body: &str) -> Option<(String, String, String)> {
    let json: Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;

    Some((
        error.get("code")?.as_str()?.to_string(),
        error.get("message")?.as_str()?.to_string(),
        error.get("category")?.as_str()?.to_string(),
    ))
}

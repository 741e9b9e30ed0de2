/// Integration tests for polled widgets and progress endpoints
mod common;

use axum::http::StatusCode;
use common::{welcome_bonus, MockCasinoApi, TestContext};
use serde_json::{json, Value};
use shared::contracts::{ActiveBonus, Jackpot, Winner};
use std::time::Duration;
use web::api::ApiError;

fn jackpot(name: &str, amount: f64) -> Jackpot {
    serde_json::from_value(json!({ "id": 1, "name": name, "amount": amount, "currency": "RUB" }))
        .unwrap()
}

fn wagering_bonus() -> ActiveBonus {
    serde_json::from_value(json!({
        "bonusId": "9",
        "bonusName": "Reload",
        "percent": 50,
        "maxBonus": 10000,
        "minDeposit": 1000,
        "wagering": 30,
        "status": "active",
        "wagerRequired": 300000,
        "wagered": 75000
    }))
    .unwrap()
}

async fn wait_for_snapshot(ctx: &TestContext, path: &str) -> Value {
    for _ in 0..100 {
        let body: Value = ctx.server.get(path).await.json();
        if !body["fetchedAt"].is_null() {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} never published a snapshot", path);
}

#[tokio::test]
async fn test_widgets_empty_before_first_poll() {
    let ctx = TestContext::new();

    let body: Value = ctx.server.get("/widgets/jackpots").await.json();
    assert_eq!(body, json!({ "data": [], "fetchedAt": null }));
}

#[tokio::test]
async fn test_widget_pollers_publish_snapshots() {
    let ctx = TestContext::new();
    ctx.api.set(|r| {
        r.jackpots = Ok(vec![jackpot("Mega", 1_250_000.0)]);
        r.winners = Ok(vec![serde_json::from_value::<Winner>(json!({
            "username": "lucky7",
            "game": "Book of Ra",
            "amount": 15000
        }))
        .unwrap()]);
    });

    let pollers = ctx
        .state
        .widgets
        .start(ctx.api.clone(), &ctx.state.config.polling, &ctx.shutdown);

    let jackpots = wait_for_snapshot(&ctx, "/widgets/jackpots").await;
    assert_eq!(jackpots["data"][0]["name"], json!("Mega"));

    let winners = wait_for_snapshot(&ctx, "/widgets/winners").await;
    assert_eq!(winners["data"][0]["player"], json!("lucky7"));

    for poller in pollers {
        poller.shutdown().await;
    }
}

#[tokio::test]
async fn test_widget_keeps_last_snapshot_when_upstream_fails() {
    let ctx = TestContext::new();
    ctx.api.set(|r| r.jackpots = Ok(vec![jackpot("Mega", 1_000_000.0)]));

    let pollers = ctx
        .state
        .widgets
        .start(ctx.api.clone(), &ctx.state.config.polling, &ctx.shutdown);
    wait_for_snapshot(&ctx, "/widgets/jackpots").await;

    ctx.api.set(|r| r.jackpots = Err(ApiError::Unavailable("down".to_string())));
    for poller in &pollers {
        poller.refresh_now();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let body: Value = ctx.server.get("/widgets/jackpots").await.json();
    assert_eq!(body["data"][0]["amount"].as_f64(), Some(1_000_000.0));

    for poller in pollers {
        poller.shutdown().await;
    }
}

#[tokio::test]
async fn test_detailed_health_reports_degraded_without_widgets() {
    let ctx = TestContext::new();

    let body: Value = ctx.server.get("/health/detailed").await.json();
    assert_eq!(body["status"], json!("degraded"));
    assert_eq!(body["active_sessions"], json!(0));

    let response = ctx.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_wager_progress() {
    let api = MockCasinoApi::default();
    api.set(|r| r.active_bonuses = Ok(vec![welcome_bonus(), wagering_bonus()]));
    let ctx = TestContext::with_api(api);
    let session = ctx.login().await;

    let response = ctx.get("/wallet/wager-progress", &session).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["bonusId"], json!("9"));
    assert_eq!(rows[0]["remaining"].as_f64(), Some(225000.0));
    assert_eq!(rows[0]["percent"].as_f64(), Some(25.0));
}

#[tokio::test]
async fn test_active_bonuses_snapshot() {
    let api = MockCasinoApi::default();
    api.set(|r| r.active_bonuses = Ok(vec![welcome_bonus()]));
    let ctx = TestContext::with_api(api);
    let session = ctx.login().await;

    let mut body = Value::Null;
    for _ in 0..100 {
        body = ctx.get("/bonuses/active", &session).await.json();
        if !body["fetchedAt"].is_null() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(body["data"][0]["bonusName"], json!("Welcome"));
}

#[tokio::test]
async fn test_vip_progress() {
    let ctx = TestContext::new();
    let session = ctx.login().await;

    let body: Value = ctx.get("/vip/progress", &session).await.json();
    assert_eq!(body["level"], json!("Silver"));
    assert_eq!(body["nextLevel"], json!("Gold"));
    assert_eq!(body["remaining"].as_f64(), Some(1500.0));
    assert_eq!(body["percent"].as_f64(), Some(25.0));
}

#[tokio::test]
async fn test_payment_methods_passthrough() {
    let ctx = TestContext::new();
    let session = ctx.login().await;

    let body: Value = ctx.get("/payment-methods", &session).await.json();
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["card", "usdt"]);
}

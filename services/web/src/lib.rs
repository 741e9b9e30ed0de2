// Library interface for the web service - exposes modules for testing

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod poller;
pub mod session;
pub mod state;
pub mod widgets;

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.cors_allow_any {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
        // Session
        .route(
            "/session",
            get(handlers::session::current)
                .post(handlers::session::login)
                .delete(handlers::session::logout),
        )
        .route("/session/refresh", post(handlers::session::refresh))
        // Deposit
        .route("/deposit/preview", post(handlers::deposit::preview))
        .route("/deposit", post(handlers::deposit::create_deposit))
        .route("/payment-methods", get(handlers::payments::list_methods))
        // Bonuses and progress
        .route("/bonuses/active", get(handlers::bonuses::active))
        .route("/wallet/wager-progress", get(handlers::progress::wager))
        .route("/vip/progress", get(handlers::progress::vip))
        // Widgets
        .route("/widgets/jackpots", get(handlers::widgets::jackpots))
        .route("/widgets/winners", get(handlers::widgets::winners))
        // State
        .with_state(state)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

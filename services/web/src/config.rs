use anyhow::{ensure, Context};
use serde::Deserialize;
use shared::constants::{
    BONUS_POLL_SECS, DEFAULT_CURRENCY, JACKPOT_POLL_SECS, SESSION_IDLE_TTL_SECS, SESSION_SWEEP_SECS,
    WINNERS_POLL_SECS,
};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_port: u16,
    pub metrics_port: u16,
    pub upstream: UpstreamConfig,
    pub polling: PollingConfig,
    pub deposit: DepositConfig,
    pub session: SessionConfig,
    pub cors_allow_any: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    pub jackpot_interval_secs: u64,
    pub winners_interval_secs: u64,
    pub bonus_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositConfig {
    pub default_currency: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PollingConfig {
    pub fn jackpot_interval(&self) -> Duration {
        Duration::from_secs(self.jackpot_interval_secs)
    }

    pub fn winners_interval(&self) -> Duration {
        Duration::from_secs(self.winners_interval_secs)
    }

    pub fn bonus_interval(&self) -> Duration {
        Duration::from_secs(self.bonus_interval_secs)
    }
}

impl SessionConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: SESSION_IDLE_TTL_SECS,
            sweep_interval_secs: SESSION_SWEEP_SECS,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            jackpot_interval_secs: JACKPOT_POLL_SECS,
            winners_interval_secs: WINNERS_POLL_SECS,
            bonus_interval_secs: BONUS_POLL_SECS,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("API_PORT must be a port number")?,
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()
                .context("METRICS_PORT must be a port number")?,
            upstream: UpstreamConfig {
                base_url: env::var("AUREX_API_URL").context("AUREX_API_URL must be set")?,
                timeout_secs: env::var("AUREX_API_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("AUREX_API_TIMEOUT_SECS must be a number of seconds")?,
            },
            polling: PollingConfig {
                jackpot_interval_secs: env::var("JACKPOT_POLL_SECS")
                    .unwrap_or_else(|_| JACKPOT_POLL_SECS.to_string())
                    .parse()
                    .context("JACKPOT_POLL_SECS must be a number of seconds")?,
                winners_interval_secs: env::var("WINNERS_POLL_SECS")
                    .unwrap_or_else(|_| WINNERS_POLL_SECS.to_string())
                    .parse()
                    .context("WINNERS_POLL_SECS must be a number of seconds")?,
                bonus_interval_secs: env::var("BONUS_POLL_SECS")
                    .unwrap_or_else(|_| BONUS_POLL_SECS.to_string())
                    .parse()
                    .context("BONUS_POLL_SECS must be a number of seconds")?,
            },
            deposit: DepositConfig {
                default_currency: env::var("DEFAULT_CURRENCY")
                    .unwrap_or_else(|_| DEFAULT_CURRENCY.to_string())
                    .to_uppercase(),
            },
            session: SessionConfig {
                idle_ttl_secs: env::var("SESSION_IDLE_TTL_SECS")
                    .unwrap_or_else(|_| SESSION_IDLE_TTL_SECS.to_string())
                    .parse()
                    .context("SESSION_IDLE_TTL_SECS must be a number of seconds")?,
                sweep_interval_secs: env::var("SESSION_SWEEP_SECS")
                    .unwrap_or_else(|_| SESSION_SWEEP_SECS.to_string())
                    .parse()
                    .context("SESSION_SWEEP_SECS must be a number of seconds")?,
            },
            cors_allow_any: env::var("CORS_ALLOW_ANY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("CORS_ALLOW_ANY must be true or false")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.upstream.base_url.starts_with("http://")
                || self.upstream.base_url.starts_with("https://"),
            "AUREX_API_URL must be an http(s) URL, got {}",
            self.upstream.base_url
        );
        ensure!(self.upstream.timeout_secs > 0, "AUREX_API_TIMEOUT_SECS must be positive");
        ensure!(
            self.polling.jackpot_interval_secs > 0
                && self.polling.winners_interval_secs > 0
                && self.polling.bonus_interval_secs > 0,
            "poll intervals must be positive"
        );
        ensure!(
            self.session.idle_ttl_secs > 0 && self.session.sweep_interval_secs > 0,
            "SESSION_IDLE_TTL_SECS and SESSION_SWEEP_SECS must be positive"
        );
        ensure!(
            self.deposit.default_currency.len() == 3,
            "DEFAULT_CURRENCY must be a 3-letter code, got {}",
            self.deposit.default_currency
        );
        Ok(())
    }
}

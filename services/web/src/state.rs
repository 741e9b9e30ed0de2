use crate::api::CasinoApi;
use crate::config::Config;
use crate::session::SessionStore;
use crate::widgets::Widgets;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<dyn CasinoApi>,
    pub sessions: SessionStore,
    pub widgets: Widgets,
}

impl AppState {
    /// Build the state; session pollers hang off `shutdown`
    pub fn new(config: Config, api: Arc<dyn CasinoApi>, shutdown: &CancellationToken) -> Self {
        let sessions = SessionStore::new(
            api.clone(),
            config.polling.bonus_interval(),
            config.session.idle_ttl(),
            shutdown.clone(),
        );

        Self {
            config: Arc::new(config),
            api,
            sessions,
            widgets: Widgets::new(),
        }
    }
}

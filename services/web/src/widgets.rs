//! Site-wide live widgets (jackpot ticker, recent winners feed)
//!
//! Polled once for the whole process and served from the latest snapshot, so
//! browser refreshes never fan out to the upstream API.

use shared::contracts::{Jackpot, Winner};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::CasinoApi;
use crate::config::PollingConfig;
use crate::poller::{spawn_poller, PollerHandle, SnapshotCell};

#[derive(Clone, Default)]
pub struct Widgets {
    pub jackpots: SnapshotCell<Vec<Jackpot>>,
    pub winners: SnapshotCell<Vec<Winner>>,
}

impl Widgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the widget pollers; keep the handles alive for as long as they should run
    pub fn start(
        &self,
        api: Arc<dyn CasinoApi>,
        polling: &PollingConfig,
        shutdown: &CancellationToken,
    ) -> Vec<PollerHandle> {
        let jackpots = {
            let api = api.clone();
            spawn_poller(
                "jackpots",
                polling.jackpot_interval(),
                shutdown,
                self.jackpots.clone(),
                move || {
                    let api = api.clone();
                    async move { api.jackpots().await }
                },
            )
        };

        let winners = spawn_poller(
            "recent_winners",
            polling.winners_interval(),
            shutdown,
            self.winners.clone(),
            move || {
                let api = api.clone();
                async move { api.recent_winners().await }
            },
        );

        tracing::info!(
            jackpot_interval_secs = polling.jackpot_interval_secs,
            winners_interval_secs = polling.winners_interval_secs,
            "Widget pollers started"
        );

        vec![jackpots, winners]
    }
}

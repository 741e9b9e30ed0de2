//! Session container
//!
//! The only place session data is mutated. Handlers go through the actions
//! (`login`, `refresh`, `logout`) and read cloned [`Session`] snapshots.
//! Each session owns an active-bonus poller that lives exactly as long as the
//! session does. Sessions end on logout, when upstream rejects their token, or
//! after sitting idle longer than the configured TTL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::contracts::{select_offer, ActiveBonus, UserProfile};
use shared::types::BonusOffer;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::api::{ApiError, CasinoApi};
use crate::errors::{AppError, Result};
use crate::poller::{spawn_poller, PollerHandle, Snapshot, SnapshotCell};

/// Read-only view of a logged-in session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub profile: UserProfile,
    #[serde(skip)]
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

type Entries = RwLock<HashMap<Uuid, SessionEntry>>;

struct SessionEntry {
    profile: UserProfile,
    token: Arc<RwLock<String>>,
    created_at: DateTime<Utc>,
    refreshed_at: DateTime<Utc>,
    last_seen_at: DateTime<Utc>,
    bonuses: SnapshotCell<Vec<ActiveBonus>>,
    bonus_poller: PollerHandle,
}

impl SessionEntry {
    async fn snapshot(&self, id: Uuid) -> Session {
        Session {
            id,
            profile: self.profile.clone(),
            token: self.token.read().await.clone(),
            created_at: self.created_at,
            refreshed_at: self.refreshed_at,
            last_seen_at: self.last_seen_at,
        }
    }
}

/// Remove a session and stop its poller
///
/// Must not be awaited from the session's own poller task.
async fn remove_session(entries: &Entries, id: Uuid, reason: &'static str) -> bool {
    let mut map = entries.write().await;
    let removed = map.remove(&id);
    metrics::gauge!("active_sessions").set(map.len() as f64);
    drop(map);

    match removed {
        Some(entry) => {
            entry.bonus_poller.shutdown().await;
            metrics::counter!("sessions_closed_total", "reason" => reason).increment(1);
            tracing::info!(session_id = %id, reason, "Session closed");
            true
        }
        None => false,
    }
}

#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<Entries>,
    api: Arc<dyn CasinoApi>,
    bonus_interval: Duration,
    idle_ttl: Duration,
    shutdown: CancellationToken,
}

impl SessionStore {
    pub fn new(
        api: Arc<dyn CasinoApi>,
        bonus_interval: Duration,
        idle_ttl: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            api,
            bonus_interval,
            idle_ttl,
            shutdown,
        }
    }

    /// Log in with an upstream token
    ///
    /// The token is checked against the auth service before anything is stored.
    pub async fn login(&self, token: String) -> Result<Session> {
        let profile = self.api.current_user(&token).await?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        let token = Arc::new(RwLock::new(token));
        let bonuses = SnapshotCell::new();

        let bonus_poller = {
            let api = self.api.clone();
            let token = token.clone();
            let entries = Arc::downgrade(&self.entries);
            spawn_poller(
                "active_bonuses",
                self.bonus_interval,
                &self.shutdown,
                bonuses.clone(),
                move || {
                    let api = api.clone();
                    let token = token.clone();
                    let entries = entries.clone();
                    async move {
                        let token = token.read().await.clone();
                        let result = api.active_bonuses(&token).await;
                        if matches!(result, Err(ApiError::Unauthorized)) {
                            end_rejected_session(entries, id);
                        }
                        result
                    }
                },
            )
        };

        let entry = SessionEntry {
            profile,
            token,
            created_at: now,
            refreshed_at: now,
            last_seen_at: now,
            bonuses,
            bonus_poller,
        };
        let session = entry.snapshot(id).await;

        let mut entries = self.entries.write().await;
        entries.insert(id, entry);
        metrics::gauge!("active_sessions").set(entries.len() as f64);

        tracing::info!(session_id = %id, user_id = %session.profile.id, "Session opened");
        Ok(session)
    }

    /// Exchange the session's token for a fresh one
    pub async fn refresh(&self, id: Uuid) -> Result<Session> {
        let token = {
            let entries = self.entries.read().await;
            let entry = entries.get(&id).ok_or_else(AppError::no_session)?;
            let token = entry.token.read().await.clone();
            token
        };

        let fresh = match self.api.refresh_token(&token).await {
            Ok(fresh) => fresh,
            Err(e) => {
                if matches!(e, ApiError::Unauthorized) {
                    // Upstream no longer honours the token; the session is dead
                    remove_session(&self.entries, id, "token_rejected").await;
                }
                return Err(e.into());
            }
        };

        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or_else(AppError::no_session)?;
        *entry.token.write().await = fresh;
        entry.refreshed_at = Utc::now();

        tracing::info!(session_id = %id, "Session token refreshed");
        Ok(entry.snapshot(id).await)
    }

    /// Drop the session and stop its pollers
    ///
    /// Returns false when there was no such session.
    pub async fn logout(&self, id: Uuid) -> bool {
        remove_session(&self.entries, id, "logout").await
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let entries = self.entries.read().await;
        match entries.get(&id) {
            Some(entry) => Some(entry.snapshot(id).await),
            None => None,
        }
    }

    /// Look up a session on behalf of a request, marking it as active
    pub async fn resolve(&self, id: Uuid) -> Option<Session> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id)?;
        entry.last_seen_at = Utc::now();
        Some(entry.snapshot(id).await)
    }

    /// Close every session idle for longer than the TTL as of `now`
    ///
    /// Returns how many sessions were closed.
    pub async fn sweep_idle(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<Uuid> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .filter(|(_, entry)| {
                    (now - entry.last_seen_at)
                        .to_std()
                        .map_or(false, |idle| idle > self.idle_ttl)
                })
                .map(|(id, _)| *id)
                .collect()
        };

        let mut closed = 0;
        for id in expired {
            if remove_session(&self.entries, id, "idle").await {
                closed += 1;
            }
        }
        closed
    }

    /// Periodically close idle sessions until shutdown
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = store.shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let closed = store.sweep_idle(Utc::now()).await;
                        if closed > 0 {
                            tracing::info!(closed, "Closed idle sessions");
                        }
                    }
                }
            }

            tracing::debug!("Session sweeper stopped");
        })
    }

    /// Latest active-bonus snapshot, `None` until the first fetch lands
    pub async fn active_bonuses(&self, id: Uuid) -> Option<Snapshot<Vec<ActiveBonus>>> {
        let cell = {
            let entries = self.entries.read().await;
            entries.get(&id)?.bonuses.clone()
        };
        cell.get().await
    }

    /// Offer to show next to the deposit form
    ///
    /// Falls back to a direct fetch when the poller has not published yet.
    /// Any failure means "no offer": the deposit flow must never block on it.
    pub async fn current_offer(&self, session: &Session) -> Option<BonusOffer> {
        if let Some(snapshot) = self.active_bonuses(session.id).await {
            return select_offer(&snapshot.data);
        }

        match self.api.active_bonuses(&session.token).await {
            Ok(bonuses) => select_offer(&bonuses),
            Err(e) => {
                tracing::debug!(session_id = %session.id, error = %e, "Active bonus unavailable, continuing without offer");
                None
            }
        }
    }

    /// Ask the session's bonus poller to re-fetch right away
    pub async fn refresh_bonuses(&self, id: Uuid) {
        let entries = self.entries.read().await;
        if let Some(entry) = entries.get(&id) {
            entry.bonus_poller.refresh_now();
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// Runs inside the session's own poller, so the removal (which waits for that
// poller to exit) happens on a separate task.
fn end_rejected_session(entries: Weak<Entries>, id: Uuid) {
    if let Some(entries) = entries.upgrade() {
        tokio::spawn(async move {
            remove_session(&entries, id, "token_rejected").await;
        });
    }
}

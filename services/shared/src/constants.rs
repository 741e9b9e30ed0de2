/// Shared constants for the AUREX wallet services
///
/// Offer figures (percent, caps, minimums, wager multipliers) are never
/// defined here: they always arrive from the upstream bonus engine.

/// Currency used for deposits when the caller does not pick one
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Tolerance when comparing a client preview against the server's figures
///
/// Differences at or below one kopeck/cent are rounding noise, not divergence.
pub const DIVERGENCE_TOLERANCE: f64 = 0.01;

/// Bonus statuses that can still be attached to a new deposit
pub const OFFERABLE_BONUS_STATUSES: [&str; 3] = ["available", "active", "pending"];

/// Default jackpot ticker refresh interval
pub const JACKPOT_POLL_SECS: u64 = 5;

/// Default live-winners feed refresh interval
pub const WINNERS_POLL_SECS: u64 = 10;

/// Default active-bonus refresh interval for a logged-in session
pub const BONUS_POLL_SECS: u64 = 30;

/// Sessions without a request for this long are closed
pub const SESSION_IDLE_TTL_SECS: u64 = 30 * 60;

/// How often idle sessions are swept
pub const SESSION_SWEEP_SECS: u64 = 60;

/// Upper bound on how far a failing poller stretches its interval
///
/// A poller that keeps failing waits interval * 2^failures, capped at
/// interval * MAX_POLL_BACKOFF_FACTOR.
pub const MAX_POLL_BACKOFF_FACTOR: u32 = 8;

/// Header carrying the browser's session id
pub const SESSION_HEADER: &str = "x-session-id";

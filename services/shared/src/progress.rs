//! Progress bar arithmetic for wagering and VIP tiers
//!
//! Figures come from the server; this only turns them into remaining amounts
//! and percentages for display.

use serde::{Deserialize, Serialize};

use crate::contracts::{ActiveBonus, VipStatus};
use crate::types::Amount;

/// Share of `done` over `total` as a 0-100 percentage
///
/// An empty span counts as complete.
fn percent_complete(done: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 100.0;
    }
    (done / total * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WagerProgress {
    pub bonus_id: String,
    pub bonus_name: String,
    pub required: Amount,
    pub wagered: Amount,
    pub remaining: Amount,
    pub percent: f64,
}

impl WagerProgress {
    /// Progress for a bonus, if the server reported its wagering requirement
    pub fn from_bonus(bonus: &ActiveBonus) -> Option<Self> {
        let required = bonus.wager_required?;
        let wagered = bonus.wagered.unwrap_or(Amount::ZERO);

        Some(Self {
            bonus_id: bonus.bonus_id.clone(),
            bonus_name: bonus.bonus_name.clone(),
            required,
            wagered,
            remaining: required.saturating_sub(wagered),
            percent: percent_complete(wagered.as_f64(), required.as_f64()),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Progress bars for every bonus that carries a wagering requirement
pub fn wager_progress(bonuses: &[ActiveBonus]) -> Vec<WagerProgress> {
    bonuses.iter().filter_map(WagerProgress::from_bonus).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_level: Option<String>,
    pub points: f64,
    /// Points still needed for the next tier, zero at the top tier
    pub remaining: f64,
    pub percent: f64,
}

impl From<&VipStatus> for TierProgress {
    fn from(status: &VipStatus) -> Self {
        let (remaining, percent) = match status.next_level_points {
            Some(next) => {
                let span = next - status.current_level_points;
                let done = status.points - status.current_level_points;
                ((next - status.points).max(0.0), percent_complete(done, span))
            }
            None => (0.0, 100.0),
        };

        Self {
            level: status.level.clone(),
            next_level: status.next_level.clone(),
            points: status.points,
            remaining,
            percent,
        }
    }
}

//! Reconciliation of the client preview with the bonus engine's grant
//!
//! The preview is only ever a hint. Once the server has answered, its figures
//! replace the preview's and the divergence is reported so it can be logged.

use serde::{Deserialize, Serialize};

use crate::calculator::DepositPreview;
use crate::constants::DIVERGENCE_TOLERANCE;
use crate::contracts::BonusActivation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub preview: DepositPreview,
    pub authoritative: BonusActivation,
    pub diverged: bool,
}

impl Reconciliation {
    /// Bonus difference the player actually received versus the estimate
    pub fn bonus_delta(&self) -> f64 {
        self.authoritative.bonus_amount.as_f64() - self.preview.bonus_amount.as_f64()
    }
}

pub fn reconcile(preview: DepositPreview, authoritative: BonusActivation) -> Reconciliation {
    let diverged = preview.has_bonus() != authoritative.has_bonus
        || preview
            .bonus_amount
            .differs_from(authoritative.bonus_amount, DIVERGENCE_TOLERANCE)
        || preview
            .wager_required
            .differs_from(authoritative.wager_required, DIVERGENCE_TOLERANCE);

    Reconciliation {
        preview,
        authoritative,
        diverged,
    }
}

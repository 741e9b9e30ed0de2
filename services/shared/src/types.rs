//! Type-safe wrappers for wallet primitives
//!
//! Amounts are validated at construction time so the calculator never sees
//! a negative or non-finite number.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be a finite number, got {0}")]
    NotFinite(f64),

    #[error("Amount must not be negative, got {0}")]
    Negative(f64),
}

/// Non-negative, finite currency amount in major units (roubles, dollars)
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Create a new Amount with validation
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite(value));
        }
        if value < 0.0 {
            return Err(ValidationError::Negative(value));
        }
        // Normalise -0.0
        Ok(Self(value.max(0.0)))
    }

    /// Parse free-text form input
    ///
    /// Empty, non-numeric, negative and non-finite input all read as zero.
    /// Whitespace (including NBSP thousands separators) is ignored. A comma is
    /// a thousands separator when a dot is present, when it repeats, or when
    /// exactly three digits follow a non-zero integer part ("1,000"); otherwise
    /// it is the decimal mark, so "1 000,50" reads as 1000.5.
    pub fn from_input(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let normalized = if comma_groups_thousands(&compact) {
            compact.replace(',', "")
        } else {
            compact.replace(',', ".")
        };

        normalized
            .parse::<f64>()
            .ok()
            .and_then(|value| Self::new(value).ok())
            .unwrap_or(Self::ZERO)
    }

    /// Clamp an arithmetic result back into range
    fn saturating(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            Self::ZERO
        } else if value.is_infinite() {
            Self(f64::MAX)
        } else {
            Self(value)
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// `percent`% of this amount, floored at zero
    pub fn percent_of(&self, percent: f64) -> Self {
        Self::saturating(self.0 * percent / 100.0)
    }

    /// Multiply by a non-negative factor (wager multipliers)
    pub fn times(&self, factor: f64) -> Self {
        Self::saturating(self.0 * factor)
    }

    pub fn min(self, other: Amount) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    /// Subtraction floored at zero
    pub fn saturating_sub(&self, other: Amount) -> Self {
        Self::saturating(self.0 - other.0)
    }

    /// True when the two amounts differ by more than `tolerance`
    pub fn differs_from(&self, other: Amount, tolerance: f64) -> bool {
        (self.0 - other.0).abs() > tolerance
    }
}

fn comma_groups_thousands(compact: &str) -> bool {
    if compact.contains('.') || compact.matches(',').count() > 1 {
        return true;
    }

    match compact.split_once(',') {
        Some((whole, fraction)) => {
            let whole = whole.trim_start_matches(['+', '-']);
            fraction.len() == 3
                && fraction.chars().all(|c| c.is_ascii_digit())
                && !whole.is_empty()
                && whole != "0"
        }
        None => false,
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::saturating(self.0 + rhs.0)
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

/// Deposit bonus offer as supplied by the bonus engine (read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusOffer {
    /// Percentage of the deposit matched as bonus (200 = 200%)
    pub percent: f64,
    /// Cap on the bonus regardless of percent
    pub max_bonus: Amount,
    /// Smallest deposit the offer applies to
    pub min_deposit: Amount,
    /// Turnover multiplier applied to deposit + bonus
    #[serde(alias = "wagering")]
    pub wager_multiplier: f64,
}

impl BonusOffer {
    /// Whether a deposit of `amount` qualifies for this offer
    pub fn applies_to(&self, amount: Amount) -> bool {
        amount >= self.min_deposit
    }
}

/// Payment method from the payments catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub min_deposit: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_deposit: Option<Amount>,
    #[serde(default)]
    pub currencies: Vec<String>,
}

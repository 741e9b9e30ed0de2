//! Deposit bonus/wager calculator
//!
//! Produces the live estimate shown next to the deposit form and the
//! client-side checks run before a deposit is submitted. Both are advisory:
//! the bonus engine re-validates and its grant is authoritative.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{ErrorCategory, ErrorCode, ServiceError};
use crate::types::{Amount, BonusOffer, PaymentMethod};

/// Estimate of what a deposit would credit and lock behind wagering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositPreview {
    pub deposit_amount: Amount,
    pub bonus_amount: Amount,
    pub total_credited: Amount,
    pub wager_required: Amount,
    /// Set when the player opted in but the deposit is below the offer minimum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_minimum: Option<Amount>,
}

impl DepositPreview {
    pub fn has_bonus(&self) -> bool {
        self.bonus_amount.is_positive()
    }
}

/// Compute the preview for a prospective deposit
///
/// Pure and idempotent; recomputed on every keystroke.
pub fn preview_deposit(
    deposit: Amount,
    offer: Option<&BonusOffer>,
    accept_bonus: bool,
) -> DepositPreview {
    let mut bonus_minimum = None;

    let bonus_amount = match offer {
        Some(offer) if accept_bonus => {
            if offer.applies_to(deposit) {
                deposit.percent_of(offer.percent).min(offer.max_bonus)
            } else {
                bonus_minimum = Some(offer.min_deposit);
                Amount::ZERO
            }
        }
        _ => Amount::ZERO,
    };

    let total_credited = deposit + bonus_amount;

    let wager_required = match offer {
        Some(offer) if bonus_amount.is_positive() => total_credited.times(offer.wager_multiplier),
        _ => Amount::ZERO,
    };

    DepositPreview {
        deposit_amount: deposit,
        bonus_amount,
        total_credited,
        wager_required,
        bonus_minimum,
    }
}

/// Reason a deposit was blocked before submission
///
/// The Display text is what the player sees in the toast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DepositRejection {
    #[error("Enter a deposit amount greater than zero")]
    NonPositiveAmount,

    #[error("Select a payment method")]
    MissingPaymentMethod,

    #[error("Payment method {0} is not available")]
    UnknownPaymentMethod(String),

    #[error("Minimum deposit for {method} is {min}")]
    BelowMethodMinimum { method: String, min: Amount },

    #[error("Maximum deposit for {method} is {max}")]
    AboveMethodMaximum { method: String, max: Amount },

    #[error("Minimum deposit for this bonus is {min}")]
    BelowBonusMinimum { min: Amount },
}

impl DepositRejection {
    /// Stable label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            DepositRejection::NonPositiveAmount => "non_positive_amount",
            DepositRejection::MissingPaymentMethod => "missing_payment_method",
            DepositRejection::UnknownPaymentMethod(_) => "unknown_payment_method",
            DepositRejection::BelowMethodMinimum { .. } => "below_method_minimum",
            DepositRejection::AboveMethodMaximum { .. } => "above_method_maximum",
            DepositRejection::BelowBonusMinimum { .. } => "below_bonus_minimum",
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            DepositRejection::NonPositiveAmount => ErrorCode::VALIDATION_INVALID_AMOUNT,
            DepositRejection::MissingPaymentMethod => ErrorCode::VALIDATION_MISSING_PAYMENT_METHOD,
            DepositRejection::UnknownPaymentMethod(_) => {
                ErrorCode::VALIDATION_UNKNOWN_PAYMENT_METHOD
            }
            DepositRejection::BelowMethodMinimum { .. } => {
                ErrorCode::VALIDATION_BELOW_METHOD_MINIMUM
            }
            DepositRejection::AboveMethodMaximum { .. } => {
                ErrorCode::VALIDATION_ABOVE_METHOD_MAXIMUM
            }
            DepositRejection::BelowBonusMinimum { .. } => ErrorCode::VALIDATION_BELOW_BONUS_MINIMUM,
        }
    }
}

impl From<DepositRejection> for ServiceError {
    fn from(rejection: DepositRejection) -> Self {
        ServiceError::new(ErrorCategory::Validation, rejection.code(), rejection.to_string())
    }
}

/// Look up the selected payment method in the catalogue
///
/// An empty selection yields `Ok(None)`; [`validate_submission`] reports it
/// after the amount check.
pub fn find_payment_method<'a>(
    methods: &'a [PaymentMethod],
    selected: &str,
) -> Result<Option<&'a PaymentMethod>, DepositRejection> {
    let selected = selected.trim();
    if selected.is_empty() {
        return Ok(None);
    }

    methods
        .iter()
        .find(|method| method.id == selected)
        .map(Some)
        .ok_or_else(|| DepositRejection::UnknownPaymentMethod(selected.to_string()))
}

/// Client-side checks run before a deposit request is sent
pub fn validate_deposit(
    deposit: Amount,
    method: Option<&PaymentMethod>,
    offer: Option<&BonusOffer>,
    accept_bonus: bool,
) -> Result<(), DepositRejection> {
    if !deposit.is_positive() {
        return Err(DepositRejection::NonPositiveAmount);
    }

    let method = method.ok_or(DepositRejection::MissingPaymentMethod)?;

    if deposit < method.min_deposit {
        return Err(DepositRejection::BelowMethodMinimum {
            method: method.name.clone(),
            min: method.min_deposit,
        });
    }

    if let Some(max) = method.max_deposit {
        if deposit > max {
            return Err(DepositRejection::AboveMethodMaximum {
                method: method.name.clone(),
                max,
            });
        }
    }

    if let Some(offer) = offer {
        if accept_bonus && !offer.applies_to(deposit) {
            return Err(DepositRejection::BelowBonusMinimum {
                min: offer.min_deposit,
            });
        }
    }

    Ok(())
}

/// Full pre-submission check against the payment catalogue
///
/// Runs the rules in player-facing order: amount, method selection, method
/// limits, bonus minimum. Returns the selected method.
pub fn validate_submission<'a>(
    deposit: Amount,
    methods: &'a [PaymentMethod],
    selected: &str,
    offer: Option<&BonusOffer>,
    accept_bonus: bool,
) -> Result<&'a PaymentMethod, DepositRejection> {
    if !deposit.is_positive() {
        return Err(DepositRejection::NonPositiveAmount);
    }

    let method = find_payment_method(methods, selected)?
        .ok_or(DepositRejection::MissingPaymentMethod)?;
    validate_deposit(deposit, Some(method), offer, accept_bonus)?;
    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(value: f64) -> Amount {
        Amount::new(value).unwrap()
    }

    fn welcome_offer() -> BonusOffer {
        BonusOffer {
            percent: 200.0,
            max_bonus: amount(70_000.0),
            min_deposit: amount(500.0),
            wager_multiplier: 30.0,
        }
    }

    fn card() -> PaymentMethod {
        PaymentMethod {
            id: "card".to_string(),
            name: "Bank card".to_string(),
            min_deposit: amount(100.0),
            max_deposit: Some(amount(300_000.0)),
            currencies: vec!["RUB".to_string()],
        }
    }

    #[test]
    fn test_preview_uncapped_bonus() {
        let preview = preview_deposit(amount(1_000.0), Some(&welcome_offer()), true);

        assert_eq!(preview.bonus_amount.as_f64(), 2_000.0);
        assert_eq!(preview.total_credited.as_f64(), 3_000.0);
        assert_eq!(preview.wager_required.as_f64(), 90_000.0);
        assert!(preview.bonus_minimum.is_none());
    }

    #[test]
    fn test_preview_bonus_capped_at_max() {
        let preview = preview_deposit(amount(50_000.0), Some(&welcome_offer()), true);

        assert_eq!(preview.bonus_amount.as_f64(), 70_000.0);
        assert_eq!(preview.total_credited.as_f64(), 120_000.0);
        assert_eq!(preview.wager_required.as_f64(), 3_600_000.0);
    }

    #[test]
    fn test_preview_declined_bonus() {
        let preview = preview_deposit(amount(1_000.0), Some(&welcome_offer()), false);

        assert!(preview.bonus_amount.is_zero());
        assert_eq!(preview.total_credited.as_f64(), 1_000.0);
        assert!(preview.wager_required.is_zero());
    }

    #[test]
    fn test_preview_without_offer() {
        let preview = preview_deposit(amount(1_000.0), None, true);

        assert!(!preview.has_bonus());
        assert_eq!(preview.total_credited.as_f64(), 1_000.0);
        assert!(preview.wager_required.is_zero());
    }

    #[test]
    fn test_preview_zero_deposit() {
        let preview = preview_deposit(Amount::ZERO, Some(&welcome_offer()), true);

        assert!(preview.bonus_amount.is_zero());
        assert!(preview.total_credited.is_zero());
        assert!(preview.wager_required.is_zero());
        assert_eq!(
            validate_deposit(Amount::ZERO, Some(&card()), Some(&welcome_offer()), true),
            Err(DepositRejection::NonPositiveAmount)
        );
    }

    #[test]
    fn test_preview_below_offer_minimum_surfaces_minimum() {
        let preview = preview_deposit(amount(300.0), Some(&welcome_offer()), true);

        assert!(preview.bonus_amount.is_zero());
        assert!(preview.wager_required.is_zero());
        assert_eq!(preview.bonus_minimum, Some(amount(500.0)));
    }

    #[test]
    fn test_preview_bonus_stays_within_bounds() {
        let offer = BonusOffer {
            min_deposit: Amount::ZERO,
            ..welcome_offer()
        };

        for deposit in [0.0, 0.01, 1.0, 999.99, 35_000.0, 35_000.01, 1e9] {
            for percent in [0.0, 1.0, 50.0, 100.0] {
                let offer = BonusOffer { percent, ..offer.clone() };
                let preview = preview_deposit(amount(deposit), Some(&offer), true);

                let expected = (deposit * percent / 100.0).min(offer.max_bonus.as_f64());
                assert_eq!(preview.bonus_amount.as_f64(), expected);
                assert!(preview.bonus_amount <= offer.max_bonus);
                assert_eq!(
                    preview.total_credited.as_f64(),
                    deposit + preview.bonus_amount.as_f64()
                );
                if preview.bonus_amount.is_zero() {
                    assert!(preview.wager_required.is_zero());
                } else {
                    assert_eq!(
                        preview.wager_required.as_f64(),
                        preview.total_credited.as_f64() * offer.wager_multiplier
                    );
                }
            }
        }
    }

    #[test]
    fn test_preview_is_idempotent() {
        let offer = welcome_offer();
        let first = preview_deposit(amount(12_345.67), Some(&offer), true);
        let second = preview_deposit(amount(12_345.67), Some(&offer), true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_validate_accepts_qualifying_deposit() {
        assert!(validate_deposit(amount(1_000.0), Some(&card()), Some(&welcome_offer()), true).is_ok());
        // Declining the bonus lifts the offer minimum
        assert!(validate_deposit(amount(200.0), Some(&card()), Some(&welcome_offer()), false).is_ok());
    }

    #[test]
    fn test_validate_rejections() {
        let offer = welcome_offer();

        assert_eq!(
            validate_deposit(amount(1_000.0), None, Some(&offer), true),
            Err(DepositRejection::MissingPaymentMethod)
        );
        assert!(matches!(
            validate_deposit(amount(50.0), Some(&card()), None, false),
            Err(DepositRejection::BelowMethodMinimum { .. })
        ));
        assert!(matches!(
            validate_deposit(amount(500_000.0), Some(&card()), None, false),
            Err(DepositRejection::AboveMethodMaximum { .. })
        ));
        assert_eq!(
            validate_deposit(amount(200.0), Some(&card()), Some(&offer), true),
            Err(DepositRejection::BelowBonusMinimum { min: amount(500.0) })
        );
    }

    #[test]
    fn test_find_payment_method() {
        let methods = vec![card()];

        assert_eq!(find_payment_method(&methods, "card").unwrap(), Some(&methods[0]));
        assert_eq!(find_payment_method(&methods, "  ").unwrap(), None);
        assert_eq!(
            find_payment_method(&methods, "crypto"),
            Err(DepositRejection::UnknownPaymentMethod("crypto".to_string()))
        );
    }

    #[test]
    fn test_submission_checks_amount_before_method() {
        let methods = vec![card()];

        assert_eq!(
            validate_submission(Amount::ZERO, &methods, "paypal", None, false),
            Err(DepositRejection::NonPositiveAmount)
        );
        assert_eq!(
            validate_submission(Amount::ZERO, &methods, "", None, false),
            Err(DepositRejection::NonPositiveAmount)
        );
        assert_eq!(
            validate_submission(amount(1_000.0), &methods, "", None, false),
            Err(DepositRejection::MissingPaymentMethod)
        );
        assert_eq!(
            validate_submission(amount(1_000.0), &methods, "paypal", None, false),
            Err(DepositRejection::UnknownPaymentMethod("paypal".to_string()))
        );
        assert_eq!(
            validate_submission(amount(1_000.0), &methods, "card", Some(&welcome_offer()), true),
            Ok(&methods[0])
        );
    }

    #[test]
    fn test_rejection_message_surfaces_minimum() {
        let rejection = DepositRejection::BelowMethodMinimum {
            method: "Bank card".to_string(),
            min: amount(100.0),
        };
        assert_eq!(rejection.to_string(), "Minimum deposit for Bank card is 100");

        let error = ServiceError::from(rejection);
        assert_eq!(error.category, ErrorCategory::Validation);
        assert_eq!(error.code, "VALIDATION_BELOW_METHOD_MINIMUM");
    }
}

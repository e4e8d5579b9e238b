//! # Monetary Helpers
//!
//! Decimal conventions shared by every computation in the workspace.
//!
//! All arithmetic runs at full `Decimal` precision; rounding to cents
//! happens once, at the presentation boundary (fiscal-document fields,
//! CLI output). Intermediate cost layers are never rounded before the
//! next layer consumes them.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::EngineError;

/// Round a monetary amount to cents, half away from zero.
///
/// This is the fiscal-document rounding convention. Call it only at the
/// presentation boundary.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Check that two amounts agree within one cent.
///
/// Tolerance check used by tests and by the orchestrator's aggregation
/// cross-check.
pub fn within_one_cent(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= Decimal::new(1, 2)
}

/// Resolve an optional monetary field, rejecting absence and negatives.
///
/// `field` and `owner_id` feed the structured error so the caller can
/// report exactly which amount on which addition is unusable.
pub fn require_amount(
    value: Option<Decimal>,
    field: &str,
    owner_id: &str,
) -> Result<Decimal, EngineError> {
    let amount = value.ok_or_else(|| EngineError::MissingField {
        field: field.to_string(),
        addition_id: owner_id.to_string(),
    })?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::InvalidAmount {
            field: field.to_string(),
            addition_id: owner_id.to_string(),
            value: amount.to_string(),
        });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(1.004)), dec!(1.00));
        assert_eq!(round_cents(dec!(102000.0)), dec!(102000.00));
    }

    #[test]
    fn test_within_one_cent() {
        assert!(within_one_cent(dec!(10.00), dec!(10.01)));
        assert!(!within_one_cent(dec!(10.00), dec!(10.02)));
    }

    #[test]
    fn test_require_amount_present() {
        let v = require_amount(Some(dec!(12.34)), "ii", "adicao-001").unwrap();
        assert_eq!(v, dec!(12.34));
    }

    #[test]
    fn test_require_amount_zero_is_valid() {
        // Zero is a legitimate declared amount; only absence is an error.
        let v = require_amount(Some(dec!(0)), "icms", "adicao-001").unwrap();
        assert_eq!(v, dec!(0));
    }

    #[test]
    fn test_require_amount_missing() {
        let err = require_amount(None, "cofins", "adicao-002").unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingField {
                field: "cofins".to_string(),
                addition_id: "adicao-002".to_string(),
            }
        );
    }

    #[test]
    fn test_require_amount_negative() {
        let err = require_amount(Some(dec!(-1)), "ipi", "adicao-003").unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount { .. }));
    }
}

//! # Cost Layering Engine
//!
//! Computes the four-layer cost chain for one product's share of an
//! addition:
//!
//! 1. **Base** — customs value + II + IPI + PIS + COFINS + ICMS +
//!    apportioned customs expenses.
//! 2. **Disbursement** — base minus the credits the regime recovers.
//! 3. **Accounting** — disbursement + financial carrying charges −
//!    recoverable-tax adjustments.
//! 4. **Price-formation base** — accounting + indirect-cost allocation +
//!    operating margin.
//!
//! Every monetary input is mandatory: a missing field fails with the
//! field name and the addition identifier, never a silent zero. All
//! arithmetic runs at full `Decimal` precision — rounding belongs to the
//! presentation boundary.
//!
//! ## Credit rules
//!
//! The credit set comes from the compiled [`RegimeRules`] table, never
//! from user input: `lucro_real` recovers PIS, COFINS and IPI;
//! `lucro_presumido` recovers IPI only; `simples_nacional` recovers
//! nothing. Monophasic products take no PIS/COFINS credit under any
//! regime — those contributions were collected single-phase at import.
//! ICMS recovery flows through the state ledger and enters the chain as
//! an externally supplied recoverable-tax adjustment, not as a
//! disbursement credit.

use rust_decimal::Decimal;

use dicalc_core::{
    Addition, Classification, CostLayers, EngineError, TaxKind, TaxRegime,
};

/// Externally supplied adjustments for the third and fourth layers.
///
/// Zero when not configured; a zero adjustment is a legitimate input,
/// unlike a missing tax amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostAdjustments {
    /// Financial carrying charges added to the accounting cost.
    pub financial_charges: Decimal,
    /// Recoverable-tax adjustments subtracted from the accounting cost.
    pub recoverable_adjustments: Decimal,
    /// Indirect-cost allocation added to the price-formation base.
    pub indirect_allocation: Decimal,
    /// Operating margin added to the price-formation base.
    pub operating_margin: Decimal,
}

/// Compute the four cost layers for `product_share` of an addition.
///
/// `product_share` is the fraction of the addition's rateable totals
/// attributable to one product, in `[0, 1]`. The classification decides
/// monophasic credit treatment; the regime decides the credit set.
///
/// # Errors
///
/// - [`EngineError::MissingField`] — any required monetary input absent.
/// - [`EngineError::InvalidAmount`] — a negative amount, or a share
///   outside `[0, 1]`.
pub fn compute_layers(
    addition: &Addition,
    product_share: Decimal,
    regime: TaxRegime,
    classification: &Classification,
    adjustments: &CostAdjustments,
) -> Result<CostLayers, EngineError> {
    if product_share < Decimal::ZERO || product_share > Decimal::ONE {
        return Err(EngineError::InvalidAmount {
            field: "product_share".to_string(),
            addition_id: addition.id(),
            value: product_share.to_string(),
        });
    }

    let customs_value = addition.customs_value()?;
    let ii = addition.tax(TaxKind::Ii)?;
    let ipi = addition.tax(TaxKind::Ipi)?;
    let pis = addition.tax(TaxKind::Pis)?;
    let cofins = addition.tax(TaxKind::Cofins)?;
    let icms = addition.tax(TaxKind::Icms)?;
    let expenses = addition.expenses()?;

    let base = (customs_value + ii + ipi + pis + cofins + icms + expenses) * product_share;

    let rules = regime.rules();
    let mut credits = Decimal::ZERO;
    if rules.allows_import_credits {
        if rules.pis_cofins_credit && !classification.is_monophasic {
            credits += pis + cofins;
        }
        if rules.ipi_credit.grants_credit() {
            credits += ipi;
        }
    }
    let disbursement = base - credits * product_share;

    let accounting =
        disbursement + adjustments.financial_charges - adjustments.recoverable_adjustments;
    let price_formation =
        accounting + adjustments.indirect_allocation + adjustments.operating_margin;

    Ok(CostLayers {
        base,
        disbursement,
        accounting,
        price_formation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicalc_core::Ncm;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn addition() -> Addition {
        let mut taxes = BTreeMap::new();
        taxes.insert(TaxKind::Ii, dec!(2000));
        taxes.insert(TaxKind::Ipi, dec!(1500));
        taxes.insert(TaxKind::Pis, dec!(1650));
        taxes.insert(TaxKind::Cofins, dec!(7600));
        taxes.insert(TaxKind::Icms, dec!(0));
        Addition {
            number: 1,
            ncm: Ncm::parse("85171231").unwrap(),
            customs_value: Some(dec!(100000)),
            freight: Some(dec!(0)),
            insurance: Some(dec!(0)),
            expenses: Some(dec!(0)),
            taxes,
            products: vec![],
        }
    }

    fn ordinary() -> Classification {
        Classification::ordinary()
    }

    #[test]
    fn test_base_cost_sums_value_taxes_and_expenses() {
        let layers = compute_layers(
            &addition(),
            Decimal::ONE,
            TaxRegime::LucroReal,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        assert_eq!(layers.base, dec!(112750));
    }

    #[test]
    fn test_lucro_real_disbursement_subtracts_pis_cofins_ipi() {
        let layers = compute_layers(
            &addition(),
            Decimal::ONE,
            TaxRegime::LucroReal,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        // 112750 - 1650 - 7600 - 1500
        assert_eq!(layers.disbursement, dec!(102000));
    }

    #[test]
    fn test_lucro_presumido_subtracts_ipi_only() {
        let layers = compute_layers(
            &addition(),
            Decimal::ONE,
            TaxRegime::LucroPresumido,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        assert_eq!(layers.disbursement, dec!(111250));
    }

    #[test]
    fn test_simples_disbursement_equals_base() {
        let layers = compute_layers(
            &addition(),
            Decimal::ONE,
            TaxRegime::SimplesNacional,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        assert_eq!(layers.disbursement, layers.base);
    }

    #[test]
    fn test_monophasic_blocks_pis_cofins_credit() {
        let monophasic = Classification {
            category: Some(dicalc_core::ProductCategory::Pharmaceuticals),
            is_monophasic: true,
        };
        let layers = compute_layers(
            &addition(),
            Decimal::ONE,
            TaxRegime::LucroReal,
            &monophasic,
            &CostAdjustments::default(),
        )
        .unwrap();
        // Only the IPI credit remains.
        assert_eq!(layers.disbursement, dec!(111250));
    }

    #[test]
    fn test_adjustment_layers() {
        let adjustments = CostAdjustments {
            financial_charges: dec!(500),
            recoverable_adjustments: dec!(200),
            indirect_allocation: dec!(1000),
            operating_margin: dec!(3000),
        };
        let layers = compute_layers(
            &addition(),
            Decimal::ONE,
            TaxRegime::LucroReal,
            &ordinary(),
            &adjustments,
        )
        .unwrap();
        assert_eq!(layers.accounting, dec!(102300));
        assert_eq!(layers.price_formation, dec!(106300));
    }

    #[test]
    fn test_half_share_halves_base_and_credits() {
        let layers = compute_layers(
            &addition(),
            dec!(0.5),
            TaxRegime::LucroReal,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        assert_eq!(layers.base, dec!(56375.0));
        assert_eq!(layers.disbursement, dec!(51000.0));
    }

    #[test]
    fn test_missing_tax_fails_with_field_name() {
        let mut addition = addition();
        addition.taxes.remove(&TaxKind::Cofins);
        let err = compute_layers(
            &addition,
            Decimal::ONE,
            TaxRegime::LucroReal,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingField {
                field: "cofins".to_string(),
                addition_id: "adicao-001".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_expenses_fails() {
        let mut addition = addition();
        addition.expenses = None;
        assert!(matches!(
            compute_layers(
                &addition,
                Decimal::ONE,
                TaxRegime::LucroReal,
                &ordinary(),
                &CostAdjustments::default(),
            )
            .unwrap_err(),
            EngineError::MissingField { ref field, .. } if field == "expenses"
        ));
    }

    #[test]
    fn test_share_outside_unit_interval_rejected() {
        let err = compute_layers(
            &addition(),
            dec!(1.5),
            TaxRegime::LucroReal,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount { ref field, .. } if field == "product_share"));
    }

    #[test]
    fn test_idempotent_over_same_inputs() {
        let a = addition();
        let first = compute_layers(
            &a,
            Decimal::ONE,
            TaxRegime::LucroReal,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        let second = compute_layers(
            &a,
            Decimal::ONE,
            TaxRegime::LucroReal,
            &ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        assert_eq!(first, second);
    }
}

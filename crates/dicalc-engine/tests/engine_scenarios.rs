//! End-to-end scenarios over the built-in configuration: the cost
//! chain, eligibility checks, NF deferral fields and reform projection,
//! plus property tests for the algebraic guarantees.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dicalc_config::ConfigSnapshot;
use dicalc_core::money::within_one_cent;
use dicalc_core::{Addition, Classification, EngineError, Ncm, TaxKind, TaxRegime, Uf};
use dicalc_engine::{
    compute_layers, CostAdjustments, IncentiveService, Phase, ReformProjector,
};

fn ncm(code: &str) -> Ncm {
    Ncm::parse(code).unwrap()
}

fn addition_with(
    customs_value: Decimal,
    ii: Decimal,
    ipi: Decimal,
    pis: Decimal,
    cofins: Decimal,
    icms: Decimal,
    expenses: Decimal,
) -> Addition {
    let mut taxes = BTreeMap::new();
    taxes.insert(TaxKind::Ii, ii);
    taxes.insert(TaxKind::Ipi, ipi);
    taxes.insert(TaxKind::Pis, pis);
    taxes.insert(TaxKind::Cofins, cofins);
    taxes.insert(TaxKind::Icms, icms);
    Addition {
        number: 1,
        ncm: ncm("85171231"),
        customs_value: Some(customs_value),
        freight: Some(Decimal::ZERO),
        insurance: Some(Decimal::ZERO),
        expenses: Some(expenses),
        taxes,
        products: vec![],
    }
}

// ── Acceptance scenarios ─────────────────────────────────────────────

#[test]
fn scenario_lucro_real_cost_chain() {
    let addition = addition_with(
        dec!(100000),
        dec!(2000),
        dec!(1500),
        dec!(1650),
        dec!(7600),
        dec!(0),
        dec!(0),
    );
    let layers = compute_layers(
        &addition,
        Decimal::ONE,
        TaxRegime::LucroReal,
        &Classification::ordinary(),
        &CostAdjustments::default(),
    )
    .unwrap();
    assert_eq!(layers.base, dec!(112750));
    assert_eq!(layers.disbursement, dec!(102000));
}

#[test]
fn scenario_sc_ttd_409_restricts_fuel_and_glass() {
    let snapshot = ConfigSnapshot::builtin();
    let service = IncentiveService::new(&snapshot);
    let report = service
        .validate_eligibility(Uf::Sc, "SC_TTD_409", &[ncm("2710"), ncm("7005")])
        .unwrap();
    assert!(!report.eligible);
    assert!(report.restricted_ncms.contains(&ncm("2710")));
    assert!(report.restricted_ncms.contains(&ncm("7005")));
}

#[test]
fn scenario_sc_ttd_409_admits_telecom_and_optics() {
    let snapshot = ConfigSnapshot::builtin();
    let service = IncentiveService::new(&snapshot);
    let report = service
        .validate_eligibility(Uf::Sc, "SC_TTD_409", &[ncm("8517"), ncm("9013")])
        .unwrap();
    assert!(report.eligible);
    assert!(report.restricted_ncms.is_empty());
}

#[test]
fn scenario_unknown_program_is_an_error() {
    let snapshot = ConfigSnapshot::builtin();
    let service = IncentiveService::new(&snapshot);
    let err = service
        .validate_eligibility(Uf::Sc, "NOT_A_PROGRAM", &[])
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownProgram { .. }));
}

#[test]
fn scenario_projection_2025_through_2033() {
    let snapshot = ConfigSnapshot::builtin();
    let projector = ReformProjector::new(&snapshot).unwrap();
    let scenarios = projector.project(2025).unwrap();

    assert_eq!(scenarios.len(), 9);
    assert_eq!(scenarios[0].year, 2025);
    assert_eq!(scenarios[0].icms_benefit_retention_pct, dec!(100));
    assert_eq!(scenarios[0].phase, Phase::Atual);
    let last = scenarios.last().unwrap();
    assert_eq!(last.year, 2033);
    assert_eq!(last.icms_benefit_retention_pct, dec!(0));
    assert_eq!(last.phase, Phase::SistemaNovo);
}

#[test]
fn scenario_schedule_is_monotonic() {
    let snapshot = ConfigSnapshot::builtin();
    let schedule = snapshot.reform_schedule();
    for pair in schedule.windows(2) {
        assert!(pair[1].retention_pct <= pair[0].retention_pct);
        assert!(pair[1].replacement_pct >= pair[0].replacement_pct);
    }
}

// ── Property tests ───────────────────────────────────────────────────

/// Monetary amounts up to 10 million, in cents.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn regime() -> impl Strategy<Value = TaxRegime> {
    prop_oneof![
        Just(TaxRegime::LucroReal),
        Just(TaxRegime::LucroPresumido),
        Just(TaxRegime::SimplesNacional),
    ]
}

proptest! {
    #[test]
    fn prop_base_cost_is_the_sum_of_its_parts(
        customs_value in amount(),
        ii in amount(),
        ipi in amount(),
        pis in amount(),
        cofins in amount(),
        icms in amount(),
        expenses in amount(),
        r in regime(),
    ) {
        let addition = addition_with(customs_value, ii, ipi, pis, cofins, icms, expenses);
        let layers = compute_layers(
            &addition,
            Decimal::ONE,
            r,
            &Classification::ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        let expected = customs_value + ii + ipi + pis + cofins + icms + expenses;
        prop_assert!(within_one_cent(layers.base, expected));
    }

    #[test]
    fn prop_disbursement_never_exceeds_base(
        customs_value in amount(),
        ii in amount(),
        ipi in amount(),
        pis in amount(),
        cofins in amount(),
        icms in amount(),
        r in regime(),
    ) {
        let addition = addition_with(customs_value, ii, ipi, pis, cofins, icms, Decimal::ZERO);
        let layers = compute_layers(
            &addition,
            Decimal::ONE,
            r,
            &Classification::ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        prop_assert!(layers.disbursement <= layers.base);
        if r == TaxRegime::SimplesNacional {
            prop_assert_eq!(layers.disbursement, layers.base);
        }
    }

    #[test]
    fn prop_compute_layers_is_idempotent(
        customs_value in amount(),
        ii in amount(),
        ipi in amount(),
        pis in amount(),
        cofins in amount(),
        icms in amount(),
        r in regime(),
    ) {
        let addition = addition_with(customs_value, ii, ipi, pis, cofins, icms, Decimal::ZERO);
        let first = compute_layers(
            &addition,
            Decimal::ONE,
            r,
            &Classification::ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        let second = compute_layers(
            &addition,
            Decimal::ONE,
            r,
            &Classification::ordinary(),
            &CostAdjustments::default(),
        )
        .unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_deferral_identity_holds(
        customs_value in amount(),
        ii in amount(),
        ipi in amount(),
        pis in amount(),
        cofins in amount(),
        program_index in 0usize..3,
    ) {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let codes = ["SC_TTD_409", "SC_TTD_410", "SC_TTD_411"];
        let addition = addition_with(
            customs_value, ii, ipi, pis, cofins, Decimal::ZERO, Decimal::ZERO,
        );
        let fields = service
            .calculate_nf_fields(&addition, Uf::Sc, codes[program_index])
            .unwrap();
        prop_assert_eq!(fields.v_icms_dif + fields.v_icms, fields.v_icms_op);
        prop_assert!(fields.p_dif >= Decimal::ZERO);
        prop_assert!(fields.p_dif <= Decimal::ONE_HUNDRED);
        prop_assert!(fields.v_icms_dif >= Decimal::ZERO);
        prop_assert!(fields.v_icms >= Decimal::ZERO);
    }

    #[test]
    fn prop_erosion_is_non_increasing(start_year in 2025i32..=2033) {
        let snapshot = ConfigSnapshot::builtin();
        let projector = ReformProjector::new(&snapshot).unwrap();
        let program = snapshot.program(Uf::Sc, "SC_TTD_409").unwrap();
        let erosion = projector.erosion(program, start_year).unwrap();
        for pair in erosion.windows(2) {
            prop_assert!(pair[1].effective_deferral_pct <= pair[0].effective_deferral_pct);
        }
    }
}

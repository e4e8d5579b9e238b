//! # Built-in Configuration Tables
//!
//! The versioned tables shipped with the crate: NCM category patterns,
//! the incentive program registry, nominal ICMS rates for the states
//! that grant import incentives, and the 2025–2033 reform transition
//! schedule.
//!
//! These are data, not behavior — deployments with newer published
//! tables load them from YAML through [`crate::ConfigSnapshot`] and get
//! the same validation.

use rust_decimal_macros::dec;

use dicalc_core::{ProductCategory, Uf};

use crate::snapshot::{
    CategoryRule, ConfigDocument, IncentiveProgram, ReformEntry, VedationRuleset,
};

fn rule(prefix: &str, category: ProductCategory, monophasic: bool) -> CategoryRule {
    CategoryRule {
        prefix: prefix.to_string(),
        category,
        monophasic,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The complete built-in configuration document.
pub fn document() -> ConfigDocument {
    ConfigDocument {
        categories: categories(),
        programs: programs(),
        icms_rates: icms_rates(),
        reform_schedule: reform_schedule(),
    }
}

/// NCM category patterns. Evaluation is longest-prefix-first, so the
/// 8-digit rules here take precedence over the heading-level ones
/// regardless of table order.
fn categories() -> Vec<CategoryRule> {
    use ProductCategory::*;
    vec![
        // Fuels and lubricants — single-phase collection.
        rule("2710", PetroleumDerivatives, true),
        rule("2711", PetroleumDerivatives, true),
        // Medicaments — single-phase collection.
        rule("3003", Pharmaceuticals, true),
        rule("3004", Pharmaceuticals, true),
        // Perfumery and personal hygiene — single-phase collection.
        rule("3303", Cosmetics, true),
        rule("3304", Cosmetics, true),
        rule("3305", Cosmetics, true),
        rule("3306", Cosmetics, true),
        rule("3307", Cosmetics, true),
        // Waters, soft drinks and beer — single-phase collection.
        rule("2201", Beverages, true),
        rule("2202", Beverages, true),
        rule("2203", Beverages, true),
        // Tyres — single-phase collection under the auto-parts regime.
        rule("4011", AutoParts, true),
        rule("4013", AutoParts, true),
        // Road vehicles and machinery — ordinary collection.
        rule("8701", Machinery, false),
        rule("8702", Vehicles, false),
        rule("8703", Vehicles, false),
        rule("8429", Machinery, false),
        rule("8433", Machinery, false),
        // Telecom equipment and optical instruments.
        rule("8517", Electronics, false),
        rule("9013", OpticalInstruments, false),
        // Arms and ammunition.
        rule("93", ArmsAndAmmunition, false),
        // Ethanol carries its own single-phase rule at the full code.
        rule("22071010", PetroleumDerivatives, true),
    ]
}

/// The incentive program registry.
///
/// Vedation sets follow the published program annexes: fuels, used
/// goods headings, flat glass, tobacco, arms and road vehicles are the
/// recurring exclusions.
fn programs() -> Vec<IncentiveProgram> {
    let sc_vedations = VedationRuleset {
        blacklist: strings(&["2710", "2711", "7005", "2401", "2402", "2403"]),
        wildcards: strings(&["87*", "93*"]),
    };
    vec![
        IncentiveProgram {
            uf: Uf::Sc,
            code: "SC_TTD_409".to_string(),
            deferral_pct: dec!(94.91),
            benefit_code: "SC830015".to_string(),
            vedations: sc_vedations.clone(),
        },
        IncentiveProgram {
            uf: Uf::Sc,
            code: "SC_TTD_410".to_string(),
            deferral_pct: dec!(100),
            benefit_code: "SC830021".to_string(),
            vedations: sc_vedations.clone(),
        },
        IncentiveProgram {
            uf: Uf::Sc,
            code: "SC_TTD_411".to_string(),
            // Benefit is a presumed credit on the outgoing operation;
            // no deferral at import.
            deferral_pct: dec!(0),
            benefit_code: "SC830023".to_string(),
            vedations: sc_vedations,
        },
        IncentiveProgram {
            uf: Uf::Es,
            code: "ES_FUNDAP".to_string(),
            deferral_pct: dec!(70),
            benefit_code: "ES000001".to_string(),
            vedations: VedationRuleset {
                blacklist: strings(&["2710", "2711", "2401", "2402", "2403"]),
                wildcards: strings(&["93*"]),
            },
        },
        IncentiveProgram {
            uf: Uf::Mg,
            code: "MG_CORREDOR".to_string(),
            deferral_pct: dec!(85),
            benefit_code: "MG800001".to_string(),
            vedations: VedationRuleset {
                blacklist: strings(&["2710", "2711", "7005"]),
                wildcards: strings(&["87*", "93*"]),
            },
        },
    ]
}

/// Nominal internal ICMS rates for the states with registered programs.
fn icms_rates() -> std::collections::BTreeMap<Uf, rust_decimal::Decimal> {
    [
        (Uf::Sc, dec!(17)),
        (Uf::Es, dec!(17)),
        (Uf::Mg, dec!(18)),
    ]
    .into_iter()
    .collect()
}

/// The 2025–2033 transition schedule: ICMS-benefit retention erodes as
/// the replacement consumption tax phases in.
fn reform_schedule() -> Vec<ReformEntry> {
    let entry = |year, retention, replacement| ReformEntry {
        year,
        retention_pct: retention,
        replacement_pct: replacement,
    };
    vec![
        entry(2025, dec!(100), dec!(0)),
        // 2026: CBS/IBS test rates alongside the current system.
        entry(2026, dec!(100), dec!(1)),
        // 2027: CBS replaces PIS/COFINS.
        entry(2027, dec!(100), dec!(10)),
        entry(2028, dec!(100), dec!(10)),
        // 2029-2032: state benefits erode one tenth of the original per
        // year while IBS ramps.
        entry(2029, dec!(90), dec!(20)),
        entry(2030, dec!(80), dec!(40)),
        entry(2031, dec!(70), dec!(60)),
        entry(2032, dec!(60), dec!(80)),
        // 2033: the new system only.
        entry(2033, dec!(0), dec!(100)),
    ]
}

//! # Configuration Snapshot
//!
//! Document types (the serde layer), load-time validation, and the
//! indexed read-only snapshot handed to the engine services.
//!
//! ## Trust boundary
//!
//! Loading is the trust boundary of the whole engine: every calculation
//! assumes the snapshot it receives is internally consistent. Validation
//! therefore rejects, with a structured error naming the offending entry:
//!
//! - unknown document keys (`deny_unknown_fields`),
//! - category prefixes or blacklist entries that are not 2–8 digits,
//! - wildcard patterns without a trailing `*` or with a non-digit stem,
//! - deferral percentages outside `[0, 100]`, empty benefit codes,
//! - ICMS rates outside `(0, 100)`,
//! - a reform schedule that is empty, non-contiguous, does not start at
//!   100% retention, does not end at 0%, or violates monotonicity.
//!
//! A program whose state lacks an ICMS rate entry is *not* rejected here:
//! eligibility checks do not need the rate, and the NF field calculator
//! reports `MissingConfiguration` precisely when it is consulted.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dicalc_core::{EngineError, Ncm, ProductCategory, Uf};

// ─── Document types ──────────────────────────────────────────────────

/// One NCM category pattern rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    /// NCM digit prefix the rule matches (2–8 digits).
    pub prefix: String,
    /// Category assigned on match.
    pub category: ProductCategory,
    /// Whether the category is under single-phase PIS/COFINS collection.
    pub monophasic: bool,
}

/// The NCM exclusion rules of one incentive program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VedationRuleset {
    /// Exact NCM prefixes that disqualify a product.
    pub blacklist: Vec<String>,
    /// Glob-style prefix wildcards (e.g. `87*`) that disqualify a product.
    pub wildcards: Vec<String>,
}

impl VedationRuleset {
    /// Whether the given NCM is disqualified by this ruleset.
    ///
    /// A blacklist entry matches as a digit prefix; a wildcard matches by
    /// its stem (the digits before `*`) as a prefix. Either match
    /// disqualifies.
    pub fn is_restricted(&self, ncm: &Ncm) -> bool {
        if self.blacklist.iter().any(|p| ncm.has_prefix(p)) {
            return true;
        }
        self.wildcards
            .iter()
            .filter_map(|w| w.strip_suffix('*'))
            .any(|stem| ncm.has_prefix(stem))
    }
}

/// A state incentive program and its deferral parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncentiveProgram {
    /// Granting state.
    pub uf: Uf,
    /// Program code (e.g. `SC_TTD_409`).
    pub code: String,
    /// Deferral percentage applied to the nominal ICMS (pDif), 0–100.
    pub deferral_pct: Decimal,
    /// Benefit code literal stamped on the fiscal document (cBenef).
    pub benefit_code: String,
    /// NCM exclusion rules.
    #[serde(default)]
    pub vedations: VedationRuleset,
}

/// One year of the tax-reform transition schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReformEntry {
    /// Calendar year.
    pub year: i32,
    /// Fraction of ICMS incentives retained, expressed 0–100.
    pub retention_pct: Decimal,
    /// Replacement-tax (CBS/IBS) introduction fraction, expressed 0–100.
    pub replacement_pct: Decimal,
}

/// The full configuration document, as serialized (YAML or JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    /// NCM category pattern table.
    pub categories: Vec<CategoryRule>,
    /// Incentive program registry.
    pub programs: Vec<IncentiveProgram>,
    /// Nominal internal ICMS rate per state, expressed 0–100.
    pub icms_rates: BTreeMap<Uf, Decimal>,
    /// Year-indexed reform schedule.
    pub reform_schedule: Vec<ReformEntry>,
}

// ─── Validation ──────────────────────────────────────────────────────

fn is_digit_prefix(s: &str) -> bool {
    (2..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

fn invalid(entry: impl Into<String>, detail: impl Into<String>) -> EngineError {
    EngineError::InvalidConfiguration {
        entry: entry.into(),
        detail: detail.into(),
    }
}

/// Validate a configuration document against the structural rules.
pub fn validate_document(doc: &ConfigDocument) -> Result<(), EngineError> {
    let hundred = Decimal::ONE_HUNDRED;

    if doc.categories.is_empty() {
        return Err(invalid("categories", "table is empty"));
    }
    for rule in &doc.categories {
        if !is_digit_prefix(&rule.prefix) {
            return Err(invalid(
                format!("categories[{}]", rule.prefix),
                "prefix must be 2-8 digits",
            ));
        }
    }

    for program in &doc.programs {
        let entry = format!("programs[{}]", program.code);
        if program.code.is_empty() {
            return Err(invalid("programs", "program code is empty"));
        }
        if program.benefit_code.is_empty() {
            return Err(invalid(entry, "benefit_code is empty"));
        }
        if program.deferral_pct < Decimal::ZERO || program.deferral_pct > hundred {
            return Err(invalid(
                entry,
                format!("deferral_pct {} outside [0, 100]", program.deferral_pct),
            ));
        }
        for prefix in &program.vedations.blacklist {
            if !is_digit_prefix(prefix) {
                return Err(invalid(
                    entry,
                    format!("blacklist entry {prefix:?} must be 2-8 digits"),
                ));
            }
        }
        for pattern in &program.vedations.wildcards {
            let stem = pattern.strip_suffix('*').ok_or_else(|| {
                invalid(
                    entry.clone(),
                    format!("wildcard {pattern:?} must end with '*'"),
                )
            })?;
            if stem.is_empty() || !stem.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid(
                    entry,
                    format!("wildcard {pattern:?} stem must be digits"),
                ));
            }
        }
    }

    for (uf, rate) in &doc.icms_rates {
        if *rate <= Decimal::ZERO || *rate >= hundred {
            return Err(invalid(
                format!("icms_rates[{uf}]"),
                format!("rate {rate} outside (0, 100)"),
            ));
        }
    }

    let schedule = &doc.reform_schedule;
    if schedule.is_empty() {
        return Err(invalid("reform_schedule", "table is empty"));
    }
    for entry in schedule {
        for (name, pct) in [
            ("retention_pct", entry.retention_pct),
            ("replacement_pct", entry.replacement_pct),
        ] {
            if pct < Decimal::ZERO || pct > hundred {
                return Err(invalid(
                    format!("reform_schedule[{}]", entry.year),
                    format!("{name} {pct} outside [0, 100]"),
                ));
            }
        }
    }
    for pair in schedule.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.year != prev.year + 1 {
            return Err(invalid(
                "reform_schedule",
                format!("years {} and {} are not contiguous", prev.year, next.year),
            ));
        }
        if next.retention_pct > prev.retention_pct {
            return Err(invalid(
                "reform_schedule",
                format!("retention increases from {} to {}", prev.year, next.year),
            ));
        }
        if next.replacement_pct < prev.replacement_pct {
            return Err(invalid(
                "reform_schedule",
                format!("replacement decreases from {} to {}", prev.year, next.year),
            ));
        }
    }
    if schedule[0].retention_pct != hundred {
        return Err(invalid(
            "reform_schedule",
            "first year must retain 100% of incentives",
        ));
    }
    if let Some(last) = schedule.last() {
        if !last.retention_pct.is_zero() {
            return Err(invalid(
                "reform_schedule",
                "last year must retain 0% of incentives",
            ));
        }
    }

    Ok(())
}

// ─── Snapshot ────────────────────────────────────────────────────────

/// The indexed, read-only configuration snapshot.
///
/// Constructed once per process before any calculation and then shared
/// freely; engine services borrow it for their whole lifetime.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    categories: Vec<CategoryRule>,
    programs: BTreeMap<(Uf, String), IncentiveProgram>,
    icms_rates: BTreeMap<Uf, Decimal>,
    reform_schedule: Vec<ReformEntry>,
}

impl ConfigSnapshot {
    /// The versioned built-in tables.
    ///
    /// Infallible by construction; `validate_document` over the same
    /// tables is exercised in tests.
    pub fn builtin() -> Self {
        Self::index(crate::builtin::document())
    }

    /// Load and validate a configuration document from a YAML string.
    pub fn from_yaml_str(input: &str) -> Result<Self, EngineError> {
        let doc: ConfigDocument = serde_yaml::from_str(input).map_err(|e| {
            EngineError::InvalidConfiguration {
                entry: "document".to_string(),
                detail: e.to_string(),
            }
        })?;
        Self::from_document(doc)
    }

    /// Load and validate a configuration document from a YAML file.
    ///
    /// Configuration loading is the one I/O step of the engine, performed
    /// explicitly before calculations begin.
    pub fn from_yaml_file(path: &Path) -> Result<Self, EngineError> {
        let input = std::fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfiguration {
                entry: path.display().to_string(),
                detail: e.to_string(),
            }
        })?;
        Self::from_yaml_str(&input)
    }

    /// Validate and index a parsed document.
    pub fn from_document(doc: ConfigDocument) -> Result<Self, EngineError> {
        validate_document(&doc)?;
        let snapshot = Self::index(doc);
        tracing::info!(
            categories = snapshot.categories.len(),
            programs = snapshot.programs.len(),
            icms_rates = snapshot.icms_rates.len(),
            reform_years = snapshot.reform_schedule.len(),
            "configuration snapshot loaded"
        );
        for program in snapshot.programs.values() {
            if !snapshot.icms_rates.contains_key(&program.uf) {
                tracing::warn!(
                    program = %program.code,
                    uf = %program.uf,
                    "program state has no ICMS rate; NF field calculation will fail"
                );
            }
        }
        Ok(snapshot)
    }

    fn index(doc: ConfigDocument) -> Self {
        let programs = doc
            .programs
            .into_iter()
            .map(|p| ((p.uf, p.code.clone()), p))
            .collect();
        Self {
            categories: doc.categories,
            programs,
            icms_rates: doc.icms_rates,
            reform_schedule: doc.reform_schedule,
        }
    }

    /// The category pattern table, in document order.
    pub fn categories(&self) -> &[CategoryRule] {
        &self.categories
    }

    /// Look up a program by its `(state, code)` pair.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownProgram`] if the pair is not registered.
    /// There is no fallback to a default program, and an unknown state
    /// fails identically — programs are keyed by the pair.
    pub fn program(&self, uf: Uf, code: &str) -> Result<&IncentiveProgram, EngineError> {
        self.programs
            .get(&(uf, code.to_string()))
            .ok_or_else(|| EngineError::UnknownProgram {
                uf: uf.to_string(),
                program: code.to_string(),
            })
    }

    /// All registered programs, in key order.
    pub fn programs(&self) -> impl Iterator<Item = &IncentiveProgram> {
        self.programs.values()
    }

    /// The nominal internal ICMS rate for a state, expressed 0–100.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingConfiguration`] if the rate table has no
    /// entry for the state.
    pub fn icms_rate(&self, uf: Uf) -> Result<Decimal, EngineError> {
        self.icms_rates.get(&uf).copied().ok_or_else(|| {
            EngineError::MissingConfiguration {
                entry: format!("icms_rates[{uf}]"),
                detail: "no nominal ICMS rate for state".to_string(),
            }
        })
    }

    /// The reform schedule, in year order.
    pub fn reform_schedule(&self) -> &[ReformEntry] {
        &self.reform_schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_document_validates() {
        validate_document(&crate::builtin::document()).unwrap();
    }

    #[test]
    fn test_builtin_snapshot_lookups() {
        let snapshot = ConfigSnapshot::builtin();
        let program = snapshot.program(Uf::Sc, "SC_TTD_409").unwrap();
        assert_eq!(program.deferral_pct, dec!(94.91));
        assert_eq!(program.benefit_code, "SC830015");
        assert_eq!(snapshot.icms_rate(Uf::Sc).unwrap(), dec!(17));
    }

    #[test]
    fn test_unknown_program_and_state_fail_the_same_way() {
        let snapshot = ConfigSnapshot::builtin();
        let err = snapshot.program(Uf::Sc, "NOT_A_PROGRAM").unwrap_err();
        assert!(matches!(err, EngineError::UnknownProgram { .. }));
        // A state with no programs at all fails identically.
        let err = snapshot.program(Uf::Ac, "SC_TTD_409").unwrap_err();
        assert!(matches!(err, EngineError::UnknownProgram { .. }));
    }

    #[test]
    fn test_vedation_prefix_and_wildcard_match() {
        let ruleset = VedationRuleset {
            blacklist: vec!["2710".to_string()],
            wildcards: vec!["87*".to_string()],
        };
        assert!(ruleset.is_restricted(&Ncm::parse("2710").unwrap()));
        assert!(ruleset.is_restricted(&Ncm::parse("27101259").unwrap()));
        assert!(ruleset.is_restricted(&Ncm::parse("87032310").unwrap()));
        assert!(!ruleset.is_restricted(&Ncm::parse("85171231").unwrap()));
    }

    #[test]
    fn test_yaml_roundtrip_of_builtin() {
        let yaml = serde_yaml::to_string(&crate::builtin::document()).unwrap();
        let snapshot = ConfigSnapshot::from_yaml_str(&yaml).unwrap();
        assert!(snapshot.program(Uf::Sc, "SC_TTD_409").is_ok());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let yaml = r#"
categories:
  - prefix: "2710"
    category: petroleum_derivatives
    monophasic: true
programs: []
icms_rates: {}
reform_schedule:
  - year: 2025
    retention_pct: 100
    replacement_pct: 0
  - year: 2026
    retention_pct: 0
    replacement_pct: 100
surprise_table: []
"#;
        assert!(ConfigSnapshot::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_deferral_pct_out_of_range_rejected() {
        let mut doc = crate::builtin::document();
        doc.programs[0].deferral_pct = dec!(100.01);
        assert!(matches!(
            ConfigSnapshot::from_document(doc).unwrap_err(),
            EngineError::InvalidConfiguration { .. }
        ));
    }

    #[test]
    fn test_non_monotonic_retention_rejected() {
        let mut doc = crate::builtin::document();
        // Bump a middle year's retention above its predecessor.
        let i = doc.reform_schedule.len() - 2;
        doc.reform_schedule[i].retention_pct = dec!(95);
        assert!(ConfigSnapshot::from_document(doc).is_err());
    }

    #[test]
    fn test_non_contiguous_schedule_rejected() {
        let mut doc = crate::builtin::document();
        doc.reform_schedule.remove(3);
        assert!(ConfigSnapshot::from_document(doc).is_err());
    }

    #[test]
    fn test_wildcard_without_star_rejected() {
        let mut doc = crate::builtin::document();
        doc.programs[0].vedations.wildcards.push("87".to_string());
        assert!(ConfigSnapshot::from_document(doc).is_err());
    }

    #[test]
    fn test_bad_category_prefix_rejected() {
        let mut doc = crate::builtin::document();
        doc.categories[0].prefix = "27XX".to_string();
        assert!(ConfigSnapshot::from_document(doc).is_err());
    }
}

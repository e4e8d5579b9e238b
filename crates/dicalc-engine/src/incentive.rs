//! # Incentive Eligibility and NF Deferral Fields
//!
//! Two services over the program registry:
//!
//! - **Eligibility** — tests a list of NCMs against a program's vedation
//!   ruleset (blacklist prefixes + glob wildcards). The report lists
//!   *every* restricted NCM, because the caller must surface all
//!   violations at once.
//! - **NF fields** — the ICMS deferral block of the outgoing fiscal
//!   document: calculation base, nominal ICMS, deferred and payable
//!   portions, the program's benefit code, and the deferral CST.
//!
//! ## Deferral identity
//!
//! `vICMSDif` is rounded to cents first and `vICMS` computed as
//! `vICMSOp − vICMSDif`, so `vICMSDif + vICMS == vICMSOp` holds exactly
//! on the emitted document.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dicalc_config::ConfigSnapshot;
use dicalc_core::money::round_cents;
use dicalc_core::{Addition, EngineError, Ncm, TaxKind, Uf};

/// CST code signaling partial or total ICMS deferral on the document.
pub const CST_ICMS_DEFERRAL: &str = "51";

/// Machine-readable reason tag for an ineligible program check.
pub const REASON_RESTRICTED: &str = "NCMs restritos";
/// Machine-readable reason tag for an eligible program check.
pub const REASON_ELIGIBLE: &str = "Programa elegível";

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    /// Whether every NCM passed the vedation ruleset.
    pub eligible: bool,
    /// Machine-readable tag consumed by the presentation layer.
    pub reason: String,
    /// Every NCM that matched a vedation rule, in input order.
    pub restricted_ncms: Vec<Ncm>,
}

/// The ICMS deferral fields of the outgoing fiscal document.
///
/// Serialized with the document field names. All monetary values are
/// rounded to cents — this struct *is* the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfFields {
    /// Deferral CST, always `"51"` for program-eligible documents.
    #[serde(rename = "CST")]
    pub cst: String,
    /// ICMS calculation base.
    #[serde(rename = "vBC")]
    pub v_bc: Decimal,
    /// Nominal ICMS that would be due absent deferral.
    #[serde(rename = "vICMSOp")]
    pub v_icms_op: Decimal,
    /// Deferred portion.
    #[serde(rename = "vICMSDif")]
    pub v_icms_dif: Decimal,
    /// Portion payable now.
    #[serde(rename = "vICMS")]
    pub v_icms: Decimal,
    /// Deferral percentage applied, 0–100.
    #[serde(rename = "pDif")]
    pub p_dif: Decimal,
    /// Program benefit code literal.
    #[serde(rename = "cBenef")]
    pub c_benef: String,
}

/// Eligibility checks and NF field calculation over the snapshot's
/// program registry.
#[derive(Debug)]
pub struct IncentiveService<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl<'a> IncentiveService<'a> {
    /// Build the service over a configuration snapshot.
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    /// Check a list of NCMs against a program's vedation ruleset.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownProgram`] if `(uf, program_code)` is not
    /// registered. An unknown state fails the same way — programs are
    /// keyed by the pair, and there is no fallback program.
    pub fn validate_eligibility(
        &self,
        uf: Uf,
        program_code: &str,
        ncms: &[Ncm],
    ) -> Result<EligibilityReport, EngineError> {
        let program = self.snapshot.program(uf, program_code)?;

        let mut restricted: Vec<Ncm> = Vec::new();
        for ncm in ncms {
            if program.vedations.is_restricted(ncm) && !restricted.contains(ncm) {
                restricted.push(ncm.clone());
            }
        }

        let eligible = restricted.is_empty();
        Ok(EligibilityReport {
            eligible,
            reason: if eligible { REASON_ELIGIBLE } else { REASON_RESTRICTED }.to_string(),
            restricted_ncms: restricted,
        })
    }

    /// Compute the NF deferral fields for one addition under a program.
    ///
    /// The ICMS base is the statutory gross-up: customs value plus
    /// federal taxes and expenses, divided by one minus the state's
    /// nominal rate. The addition must carry its ICMS entry (possibly
    /// zero) — a declaration that never reached ICMS assessment fails
    /// loudly instead of producing document fields from incomplete data.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownProgram`] — unregistered `(uf, program)`.
    /// - [`EngineError::MissingConfiguration`] — no nominal ICMS rate
    ///   for the state.
    /// - [`EngineError::MissingField`] — a required amount absent on the
    ///   addition.
    pub fn calculate_nf_fields(
        &self,
        addition: &Addition,
        uf: Uf,
        program_code: &str,
    ) -> Result<NfFields, EngineError> {
        let program = self.snapshot.program(uf, program_code)?;
        let rate = self.snapshot.icms_rate(uf)? / Decimal::ONE_HUNDRED;

        // The ICMS entry itself does not feed the gross-up, but its
        // absence means the addition never went through assessment.
        addition.tax(TaxKind::Icms)?;

        let customs_value = addition.customs_value()?;
        let ii = addition.tax(TaxKind::Ii)?;
        let ipi = addition.tax(TaxKind::Ipi)?;
        let pis = addition.tax(TaxKind::Pis)?;
        let cofins = addition.tax(TaxKind::Cofins)?;
        let expenses = addition.expenses()?;

        let before_gross_up = customs_value + ii + ipi + pis + cofins + expenses;
        let v_bc = round_cents(before_gross_up / (Decimal::ONE - rate));
        let v_icms_op = round_cents(v_bc * rate);
        let v_icms_dif = round_cents(v_icms_op * program.deferral_pct / Decimal::ONE_HUNDRED);
        let v_icms = v_icms_op - v_icms_dif;

        Ok(NfFields {
            cst: CST_ICMS_DEFERRAL.to_string(),
            v_bc,
            v_icms_op,
            v_icms_dif,
            v_icms,
            p_dif: program.deferral_pct,
            c_benef: program.benefit_code.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn ncm(code: &str) -> Ncm {
        Ncm::parse(code).unwrap()
    }

    fn addition() -> Addition {
        let mut taxes = BTreeMap::new();
        taxes.insert(TaxKind::Ii, dec!(2000));
        taxes.insert(TaxKind::Ipi, dec!(1500));
        taxes.insert(TaxKind::Pis, dec!(1650));
        taxes.insert(TaxKind::Cofins, dec!(7600));
        taxes.insert(TaxKind::Icms, dec!(0));
        Addition {
            number: 1,
            ncm: ncm("85171231"),
            customs_value: Some(dec!(100000)),
            freight: Some(dec!(0)),
            insurance: Some(dec!(0)),
            expenses: Some(dec!(0)),
            taxes,
            products: vec![],
        }
    }

    // ── Eligibility ──────────────────────────────────────────────────

    #[test]
    fn test_restricted_ncms_all_reported() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let report = service
            .validate_eligibility(Uf::Sc, "SC_TTD_409", &[ncm("2710"), ncm("7005")])
            .unwrap();
        assert!(!report.eligible);
        assert_eq!(report.reason, REASON_RESTRICTED);
        assert_eq!(report.restricted_ncms, vec![ncm("2710"), ncm("7005")]);
    }

    #[test]
    fn test_eligible_ncms() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let report = service
            .validate_eligibility(Uf::Sc, "SC_TTD_409", &[ncm("8517"), ncm("9013")])
            .unwrap();
        assert!(report.eligible);
        assert_eq!(report.reason, REASON_ELIGIBLE);
        assert!(report.restricted_ncms.is_empty());
    }

    #[test]
    fn test_wildcard_restricts_vehicles() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let report = service
            .validate_eligibility(Uf::Sc, "SC_TTD_409", &[ncm("87032310")])
            .unwrap();
        assert!(!report.eligible);
        assert_eq!(report.restricted_ncms, vec![ncm("87032310")]);
    }

    #[test]
    fn test_unknown_program_fails() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let err = service
            .validate_eligibility(Uf::Sc, "NOT_A_PROGRAM", &[])
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownProgram {
                uf: "SC".to_string(),
                program: "NOT_A_PROGRAM".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_ncm_list_is_eligible() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let report = service
            .validate_eligibility(Uf::Sc, "SC_TTD_409", &[])
            .unwrap();
        assert!(report.eligible);
    }

    // ── NF fields ────────────────────────────────────────────────────

    #[test]
    fn test_nf_fields_for_sc_ttd_409() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let fields = service
            .calculate_nf_fields(&addition(), Uf::Sc, "SC_TTD_409")
            .unwrap();

        assert_eq!(fields.cst, "51");
        assert_eq!(fields.c_benef, "SC830015");
        assert_eq!(fields.p_dif, dec!(94.91));
        // 112750 / (1 - 0.17)
        assert_eq!(fields.v_bc, dec!(135843.37));
        assert_eq!(fields.v_icms_op, dec!(23093.37));
        // Deferral identity is exact on the document.
        assert_eq!(fields.v_icms_dif + fields.v_icms, fields.v_icms_op);
    }

    #[test]
    fn test_full_deferral_pays_nothing_now() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let fields = service
            .calculate_nf_fields(&addition(), Uf::Sc, "SC_TTD_410")
            .unwrap();
        assert_eq!(fields.v_icms_dif, fields.v_icms_op);
        assert_eq!(fields.v_icms, dec!(0.00));
    }

    #[test]
    fn test_zero_deferral_pays_everything_now() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let fields = service
            .calculate_nf_fields(&addition(), Uf::Sc, "SC_TTD_411")
            .unwrap();
        assert_eq!(fields.v_icms_dif, dec!(0.00));
        assert_eq!(fields.v_icms, fields.v_icms_op);
    }

    #[test]
    fn test_missing_icms_entry_fails() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let mut addition = addition();
        addition.taxes.remove(&TaxKind::Icms);
        let err = service
            .calculate_nf_fields(&addition, Uf::Sc, "SC_TTD_409")
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingField { ref field, .. } if field == "icms"
        ));
    }

    #[test]
    fn test_missing_rate_is_missing_configuration() {
        // A registry loaded without a rate for the program's state fails
        // only when the NF calculator is consulted.
        let mut doc = dicalc_config::builtin::document();
        doc.icms_rates.remove(&Uf::Sc);
        let snapshot = ConfigSnapshot::from_document(doc).unwrap();
        let service = IncentiveService::new(&snapshot);
        let err = service
            .calculate_nf_fields(&addition(), Uf::Sc, "SC_TTD_409")
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingConfiguration { .. }));
    }

    #[test]
    fn test_nf_serde_uses_document_field_names() {
        let snapshot = ConfigSnapshot::builtin();
        let service = IncentiveService::new(&snapshot);
        let fields = service
            .calculate_nf_fields(&addition(), Uf::Sc, "SC_TTD_409")
            .unwrap();
        let json = serde_json::to_value(&fields).unwrap();
        assert!(json.get("CST").is_some());
        assert!(json.get("vICMSDif").is_some());
        assert!(json.get("cBenef").is_some());
        assert!(json.get("pDif").is_some());
    }
}

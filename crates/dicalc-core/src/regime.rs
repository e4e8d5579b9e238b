//! # Tax Regimes and Credit Rules
//!
//! The closed set of federal tax regimes and the compiled table of which
//! import tax credits each regime may recover. Regimes are fixed — there
//! are no user-defined regimes, so the rules table lives in code rather
//! than configuration and every lookup is infallible.
//!
//! Attempting to credit a tax kind a regime disallows is a programming
//! error by construction: the cost engine derives the credit set from
//! [`RegimeRules`], never from user input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The federal tax regime of the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Non-cumulative regime (apuração não cumulativa).
    LucroReal,
    /// Cumulative regime (apuração cumulativa).
    LucroPresumido,
    /// Simplified regime for small enterprises.
    SimplesNacional,
}

/// Whether a regime recovers a given tax as credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditPolicy {
    /// Full credit of the amount paid at import.
    Integral,
    /// No credit.
    None,
}

impl CreditPolicy {
    /// Whether any credit is taken under this policy.
    pub fn grants_credit(&self) -> bool {
        matches!(self, Self::Integral)
    }
}

/// The credit rules of one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    /// Whether the regime recovers any import credits at all.
    pub allows_import_credits: bool,
    /// Whether PIS/COFINS paid at import is credited.
    pub pis_cofins_credit: bool,
    /// IPI credit policy.
    pub ipi_credit: CreditPolicy,
    /// ICMS credit policy.
    pub icms_credit: CreditPolicy,
}

/// Credit rules of the non-cumulative regime.
const LUCRO_REAL_RULES: RegimeRules = RegimeRules {
    allows_import_credits: true,
    pis_cofins_credit: true,
    ipi_credit: CreditPolicy::Integral,
    icms_credit: CreditPolicy::Integral,
};

/// Credit rules of the cumulative regime.
const LUCRO_PRESUMIDO_RULES: RegimeRules = RegimeRules {
    allows_import_credits: true,
    pis_cofins_credit: false,
    ipi_credit: CreditPolicy::Integral,
    icms_credit: CreditPolicy::None,
};

/// Credit rules of the simplified regime.
const SIMPLES_NACIONAL_RULES: RegimeRules = RegimeRules {
    allows_import_credits: false,
    pis_cofins_credit: false,
    ipi_credit: CreditPolicy::None,
    icms_credit: CreditPolicy::None,
};

impl TaxRegime {
    /// All regimes in canonical order.
    pub fn all() -> &'static [TaxRegime] {
        &[Self::LucroReal, Self::LucroPresumido, Self::SimplesNacional]
    }

    /// The compiled credit rules for this regime.
    pub fn rules(&self) -> &'static RegimeRules {
        match self {
            Self::LucroReal => &LUCRO_REAL_RULES,
            Self::LucroPresumido => &LUCRO_PRESUMIDO_RULES,
            Self::SimplesNacional => &SIMPLES_NACIONAL_RULES,
        }
    }

    /// The snake_case identifier, matching the serde wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LucroReal => "lucro_real",
            Self::LucroPresumido => "lucro_presumido",
            Self::SimplesNacional => "simples_nacional",
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxRegime {
    type Err = String;

    /// Parse a regime identifier. Accepts both snake_case and the
    /// kebab-case spelling used on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "lucro_real" => Ok(Self::LucroReal),
            "lucro_presumido" => Ok(Self::LucroPresumido),
            "simples_nacional" => Ok(Self::SimplesNacional),
            other => Err(format!("unknown tax regime: {other:?}")),
        }
    }
}

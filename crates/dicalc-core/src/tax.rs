//! # Import Tax Kinds
//!
//! The closed set of federal and state taxes assessed on an import
//! declaration. Addition records carry a map from `TaxKind` to the
//! amount due; the cost engine resolves each entry through a checked
//! accessor so a missing tax is a structured error, never a zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A tax assessed on an import addition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    /// Import duty (Imposto de Importação).
    Ii,
    /// Tax on industrialized products (Imposto sobre Produtos Industrializados).
    Ipi,
    /// Social integration program contribution (PIS-Importação).
    Pis,
    /// Social security financing contribution (COFINS-Importação).
    Cofins,
    /// State VAT (Imposto sobre Circulação de Mercadorias e Serviços).
    Icms,
}

/// Number of tax kinds. Used for compile-time assertions.
pub const TAX_KIND_COUNT: usize = 5;

impl TaxKind {
    /// All tax kinds in assessment order.
    pub fn all() -> &'static [TaxKind] {
        &[Self::Ii, Self::Ipi, Self::Pis, Self::Cofins, Self::Icms]
    }

    /// The snake_case identifier, matching the serde wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ii => "ii",
            Self::Ipi => "ipi",
            Self::Pis => "pis",
            Self::Cofins => "cofins",
            Self::Icms => "icms",
        }
    }
}

impl fmt::Display for TaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown tax kind: {s:?}"))
    }
}

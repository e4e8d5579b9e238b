//! # UF — Federative Unit Codes
//!
//! The closed set of the 27 Brazilian federative units. This is the ONE
//! definition used across the workspace: incentive programs, ICMS rate
//! tables and importer records all key on it, and every `match` on `Uf`
//! must be exhaustive.
//!
//! Unknown state strings are rejected at parse time; there is no
//! catch-all variant that could swallow a typo into a silent lookup miss.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A Brazilian federative unit (state or federal district).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Uf {
    /// Acre.
    Ac,
    /// Alagoas.
    Al,
    /// Amazonas.
    Am,
    /// Amapá.
    Ap,
    /// Bahia.
    Ba,
    /// Ceará.
    Ce,
    /// Distrito Federal.
    Df,
    /// Espírito Santo.
    Es,
    /// Goiás.
    Go,
    /// Maranhão.
    Ma,
    /// Mato Grosso.
    Mt,
    /// Mato Grosso do Sul.
    Ms,
    /// Minas Gerais.
    Mg,
    /// Pará.
    Pa,
    /// Paraíba.
    Pb,
    /// Paraná.
    Pr,
    /// Pernambuco.
    Pe,
    /// Piauí.
    Pi,
    /// Rio de Janeiro.
    Rj,
    /// Rio Grande do Norte.
    Rn,
    /// Rio Grande do Sul.
    Rs,
    /// Rondônia.
    Ro,
    /// Roraima.
    Rr,
    /// Santa Catarina.
    Sc,
    /// São Paulo.
    Sp,
    /// Sergipe.
    Se,
    /// Tocantins.
    To,
}

/// Total number of federative units.
pub const UF_COUNT: usize = 27;

impl Uf {
    /// All 27 units in canonical (code-alphabetical) order.
    pub fn all() -> &'static [Uf] {
        &[
            Self::Ac,
            Self::Al,
            Self::Am,
            Self::Ap,
            Self::Ba,
            Self::Ce,
            Self::Df,
            Self::Es,
            Self::Go,
            Self::Ma,
            Self::Mg,
            Self::Ms,
            Self::Mt,
            Self::Pa,
            Self::Pb,
            Self::Pe,
            Self::Pi,
            Self::Pr,
            Self::Rj,
            Self::Rn,
            Self::Ro,
            Self::Rr,
            Self::Rs,
            Self::Sc,
            Self::Se,
            Self::Sp,
            Self::To,
        ]
    }

    /// The two-letter uppercase code, matching the serde wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ac => "AC",
            Self::Al => "AL",
            Self::Am => "AM",
            Self::Ap => "AP",
            Self::Ba => "BA",
            Self::Ce => "CE",
            Self::Df => "DF",
            Self::Es => "ES",
            Self::Go => "GO",
            Self::Ma => "MA",
            Self::Mg => "MG",
            Self::Ms => "MS",
            Self::Mt => "MT",
            Self::Pa => "PA",
            Self::Pb => "PB",
            Self::Pe => "PE",
            Self::Pi => "PI",
            Self::Pr => "PR",
            Self::Rj => "RJ",
            Self::Rn => "RN",
            Self::Ro => "RO",
            Self::Rr => "RR",
            Self::Rs => "RS",
            Self::Sc => "SC",
            Self::Se => "SE",
            Self::Sp => "SP",
            Self::To => "TO",
        }
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Uf {
    type Err = EngineError;

    /// Parse a two-letter uppercase state code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|uf| uf.as_str() == s)
            .copied()
            .ok_or_else(|| EngineError::UnknownState { uf: s.to_string() })
    }
}

//! # NCM — Validated Tariff Code Newtype
//!
//! `Ncm` wraps a Mercosur Common Nomenclature code. Construction strips
//! the conventional dot separators (`8703.23.10` → `87032310`) and
//! rejects anything that is not 2–8 ASCII digits.
//!
//! ## Invariant
//!
//! Malformed codes are **rejected at construction** — there is no
//! unchecked constructor, so every `Ncm` in the system is well-formed.
//! Classifier and vedation matching operate on digit prefixes only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A validated NCM tariff code: 2 to 8 digits, dots stripped.
///
/// Partial codes (chapter or heading prefixes such as `2710`) are valid —
/// vedation rulesets and category tables are keyed by prefix, and
/// upstream declarations sometimes carry heading-level codes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ncm(String);

impl Ncm {
    /// Parse a tariff code, stripping dot separators.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidNcm`] if the stripped code is empty,
    /// longer than 8 digits, shorter than 2, or contains a non-digit.
    pub fn parse(input: &str) -> Result<Self, EngineError> {
        let digits: String = input.chars().filter(|c| *c != '.').collect();
        if digits.chars().any(|c| !c.is_ascii_digit()) {
            return Err(EngineError::InvalidNcm {
                input: input.to_string(),
                reason: "contains non-digit characters".to_string(),
            });
        }
        if digits.len() < 2 || digits.len() > 8 {
            return Err(EngineError::InvalidNcm {
                input: input.to_string(),
                reason: format!("expected 2-8 digits, got {}", digits.len()),
            });
        }
        Ok(Self(digits))
    }

    /// The bare digit string (no separators).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this code starts with the given digit prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl FromStr for Ncm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ncm {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ncm> for String {
    fn from(ncm: Ncm) -> Self {
        ncm.0
    }
}

impl fmt::Display for Ncm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

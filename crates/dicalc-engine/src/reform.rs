//! # Reform Scenario Projector
//!
//! Projects, year by year, how state ICMS incentives erode and the
//! replacement consumption tax phases in under the configured
//! transition schedule.
//!
//! The projector does not compute the schedule from a formula — it reads
//! the versioned year→value table and classifies each year's phase from
//! the data. Construction re-checks the monotonic invariant (retention
//! non-increasing, replacement non-decreasing) and refuses to project
//! over a violating table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dicalc_config::{ConfigSnapshot, IncentiveProgram, ReformEntry};
use dicalc_core::EngineError;

/// The transition phase of one schedule year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Current system: incentives fully retained.
    Atual,
    /// Gradual reduction band.
    ReducaoGradual,
    /// New system only: incentives extinct, replacement tax in full.
    SistemaNovo,
}

impl Phase {
    /// The snake_case identifier, matching the serde wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atual => "atual",
            Self::ReducaoGradual => "reducao_gradual",
            Self::SistemaNovo => "sistema_novo",
        }
    }

    /// Classify a year's phase from its retention percentage.
    fn from_retention(retention_pct: Decimal) -> Self {
        if retention_pct == Decimal::ONE_HUNDRED {
            Self::Atual
        } else if retention_pct.is_zero() {
            Self::SistemaNovo
        } else {
            Self::ReducaoGradual
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformScenario {
    /// Calendar year.
    pub year: i32,
    /// Fraction of ICMS incentives retained, 0–100.
    pub icms_benefit_retention_pct: Decimal,
    /// Replacement-tax introduction fraction, 0–100.
    pub replacement_tax_pct: Decimal,
    /// Phase classification for the year.
    pub phase: Phase,
}

/// One year of a program's effective-deferral erosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErosionEntry {
    /// Calendar year.
    pub year: i32,
    /// The program's deferral percentage after retention, 0–100.
    pub effective_deferral_pct: Decimal,
    /// Phase classification for the year.
    pub phase: Phase,
}

/// Projector over the snapshot's reform schedule.
#[derive(Debug)]
pub struct ReformProjector<'a> {
    schedule: &'a [ReformEntry],
}

impl<'a> ReformProjector<'a> {
    /// Build a projector, re-validating the schedule's monotonic
    /// invariant.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfiguration`] if retention increases or
    /// replacement decreases anywhere in the table.
    pub fn new(snapshot: &'a ConfigSnapshot) -> Result<Self, EngineError> {
        let schedule = snapshot.reform_schedule();
        for pair in schedule.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.retention_pct > prev.retention_pct
                || next.replacement_pct < prev.replacement_pct
            {
                return Err(EngineError::InvalidConfiguration {
                    entry: "reform_schedule".to_string(),
                    detail: format!(
                        "monotonic invariant violated between {} and {}",
                        prev.year, next.year
                    ),
                });
            }
        }
        Ok(Self { schedule })
    }

    /// First year covered by the schedule.
    fn first_year(&self) -> i32 {
        self.schedule.first().map(|e| e.year).unwrap_or_default()
    }

    /// Last year covered by the schedule.
    fn last_year(&self) -> i32 {
        self.schedule.last().map(|e| e.year).unwrap_or_default()
    }

    fn check_bounds(&self, start_year: i32) -> Result<(), EngineError> {
        if start_year < self.first_year() || start_year > self.last_year() {
            return Err(EngineError::InvalidYear {
                year: start_year,
                first: self.first_year(),
                last: self.last_year(),
            });
        }
        Ok(())
    }

    /// Project one scenario per year from `start_year` through the
    /// schedule's last year.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidYear`] if `start_year` predates the first
    /// entry or exceeds the last.
    pub fn project(&self, start_year: i32) -> Result<Vec<ReformScenario>, EngineError> {
        self.check_bounds(start_year)?;
        Ok(self
            .schedule
            .iter()
            .filter(|e| e.year >= start_year)
            .map(|e| ReformScenario {
                year: e.year,
                icms_benefit_retention_pct: e.retention_pct,
                replacement_tax_pct: e.replacement_pct,
                phase: Phase::from_retention(e.retention_pct),
            })
            .collect())
    }

    /// Project a program's effective deferral percentage year by year:
    /// the configured `pDif` scaled by each year's retention.
    ///
    /// # Errors
    ///
    /// Same bounds rules as [`ReformProjector::project`].
    pub fn erosion(
        &self,
        program: &IncentiveProgram,
        start_year: i32,
    ) -> Result<Vec<ErosionEntry>, EngineError> {
        self.check_bounds(start_year)?;
        Ok(self
            .schedule
            .iter()
            .filter(|e| e.year >= start_year)
            .map(|e| ErosionEntry {
                year: e.year,
                effective_deferral_pct: program.deferral_pct * e.retention_pct
                    / Decimal::ONE_HUNDRED,
                phase: Phase::from_retention(e.retention_pct),
            })
            .collect())
    }
}

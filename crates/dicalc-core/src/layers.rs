//! # Cost Layers
//!
//! The four progressively-adjusted cost figures derived for each product
//! and aggregated per addition and per declaration:
//!
//! ```text
//! base ──▶ disbursement ──▶ accounting ──▶ price_formation
//! ```
//!
//! Each layer depends only on the previous one. Values are carried at
//! full `Decimal` precision; [`CostLayers::rounded()`] produces the
//! presentation copy and is the only place cents rounding happens.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::round_cents;

/// The four-layer cost chain for a product or an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLayers {
    /// Custo base: customs value plus all import taxes and apportioned
    /// customs expenses.
    pub base: Decimal,
    /// Custo de desembolso: base minus the credits the regime recovers.
    pub disbursement: Decimal,
    /// Custo contábil: disbursement plus financial carrying charges minus
    /// recoverable-tax adjustments.
    pub accounting: Decimal,
    /// Base de formação de preço: accounting plus indirect-cost
    /// allocation and operating margin.
    pub price_formation: Decimal,
}

impl CostLayers {
    /// An all-zero chain, the identity for aggregation.
    pub fn zero() -> Self {
        Self {
            base: Decimal::ZERO,
            disbursement: Decimal::ZERO,
            accounting: Decimal::ZERO,
            price_formation: Decimal::ZERO,
        }
    }

    /// Accumulate another chain into this one (per-product → per-addition
    /// → per-declaration totals).
    pub fn accumulate(&mut self, other: &CostLayers) {
        self.base += other.base;
        self.disbursement += other.disbursement;
        self.accounting += other.accounting;
        self.price_formation += other.price_formation;
    }

    /// Presentation copy with every layer rounded to cents.
    pub fn rounded(&self) -> Self {
        Self {
            base: round_cents(self.base),
            disbursement: round_cents(self.disbursement),
            accounting: round_cents(self.accounting),
            price_formation: round_cents(self.price_formation),
        }
    }
}

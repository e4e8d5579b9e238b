//! # dicalc-engine — The DI Cost and Incentive Computations
//!
//! The five computations over an import declaration and a read-only
//! [`ConfigSnapshot`](dicalc_config::ConfigSnapshot):
//!
//! - [`classify`] — NCM category and monophasic classification,
//!   longest-prefix-first.
//! - [`cost`] — the four-layer cost chain (base → disbursement →
//!   accounting → price formation) under a tax regime.
//! - [`incentive`] — incentive program eligibility against vedation
//!   rulesets, and the deferral fields of the outgoing fiscal document.
//! - [`reform`] — year-by-year projection of incentive erosion under the
//!   2025–2033 transition schedule.
//! - [`session`] — the declaration-level orchestrator tying the above
//!   together for a whole declaration.
//!
//! ## Concurrency
//!
//! Every service here is a stateless borrow of the configuration
//! snapshot. Nothing suspends, retries, or mutates shared state;
//! arbitrarily many calculations may run concurrently over one snapshot
//! without synchronization.

pub mod classify;
pub mod cost;
pub mod incentive;
pub mod reform;
pub mod session;

pub use classify::Classifier;
pub use cost::{compute_layers, CostAdjustments};
pub use incentive::{EligibilityReport, IncentiveService, NfFields, CST_ICMS_DEFERRAL};
pub use reform::{ErosionEntry, Phase, ReformProjector, ReformScenario};
pub use session::{AdditionCosts, CalculationSession, DeclarationCosts, ProductCosts};

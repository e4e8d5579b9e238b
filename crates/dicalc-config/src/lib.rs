//! # dicalc-config — Configuration Snapshot
//!
//! The read-only configuration the engine computes against: the NCM
//! category/monophasic pattern table, the per-state incentive program
//! registry (deferral percentage, benefit code, vedation ruleset), the
//! nominal ICMS rate table, and the year-indexed tax-reform schedule.
//!
//! ## Design
//!
//! - Configuration is **versioned data, not code**: the built-in tables
//!   ship with the crate, and external YAML documents with the same shape
//!   can replace them.
//! - Every load path ends in [`snapshot::validate_document`]. Documents
//!   with unknown keys, out-of-range percentages, malformed patterns or a
//!   non-monotonic reform schedule are rejected at load time — never
//!   silently accepted and discovered mid-calculation.
//! - The snapshot is passed **explicitly** into every engine service.
//!   There is no global singleton, so parallel test runs can use distinct
//!   fixtures.
//! - After construction the snapshot is immutable (`Send + Sync`, no
//!   interior mutability) and safe to share across threads without
//!   locking.

pub mod builtin;
pub mod snapshot;

pub use snapshot::{
    CategoryRule, ConfigDocument, ConfigSnapshot, IncentiveProgram, ReformEntry,
    VedationRuleset,
};

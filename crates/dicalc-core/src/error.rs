//! # Error Types — Structured Error Taxonomy
//!
//! Defines the closed set of error kinds surfaced by the engine. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every variant carries machine-checkable fields: the offending field
//!   name, the addition/product identifier, the lookup key, or the
//!   violated bound.
//! - The engine never substitutes a default, zero, or guessed value for
//!   missing required data — it surfaces the specific error and stops.
//! - Human-facing prose is generated at the presentation boundary, not
//!   embedded here.

use thiserror::Error;

/// Top-level error type for the dicalc engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A required monetary or identifier field is absent on the input.
    #[error("missing required field '{field}' on {addition_id}")]
    MissingField {
        /// Name of the absent field (e.g. `"icms"`, `"customs_value"`).
        field: String,
        /// Identifier of the addition or product the field belongs to.
        addition_id: String,
    },

    /// A monetary field carries a negative amount.
    #[error("invalid amount for '{field}' on {addition_id}: {value}")]
    InvalidAmount {
        /// Name of the offending field.
        field: String,
        /// Identifier of the addition or product the field belongs to.
        addition_id: String,
        /// The rejected value, rendered as received.
        value: String,
    },

    /// The `(state, program)` pair is not registered in the configuration.
    #[error("unknown incentive program {uf}:{program}")]
    UnknownProgram {
        /// State code of the lookup.
        uf: String,
        /// Program code of the lookup.
        program: String,
    },

    /// A state code is not present in the configuration table consulted.
    #[error("unknown state '{uf}'")]
    UnknownState {
        /// The unrecognized state code.
        uf: String,
    },

    /// A projection year falls outside the reform schedule bounds.
    #[error("year {year} is outside the reform schedule ({first}-{last})")]
    InvalidYear {
        /// The rejected year.
        year: i32,
        /// First year covered by the schedule.
        first: i32,
        /// Last year covered by the schedule.
        last: i32,
    },

    /// A configuration entry needed by a calculation is structurally
    /// incomplete (e.g. a program without an ICMS rate for its state).
    #[error("missing configuration for {entry}: {detail}")]
    MissingConfiguration {
        /// The incomplete entry (e.g. `"icms_rates[SC]"`).
        entry: String,
        /// What exactly is missing.
        detail: String,
    },

    /// A configuration table was rejected at load time.
    #[error("invalid configuration in {entry}: {detail}")]
    InvalidConfiguration {
        /// The offending table or entry.
        entry: String,
        /// The violated rule.
        detail: String,
    },

    /// A tariff code failed validation at construction.
    #[error("invalid NCM {input:?}: {reason}")]
    InvalidNcm {
        /// The rejected input, as received.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

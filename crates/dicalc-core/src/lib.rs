//! # dicalc-core — Foundational Types for the DI Cost Engine
//!
//! This crate is the bedrock of the dicalc workspace. It defines the
//! type-system primitives that enforce correctness guarantees at compile
//! time. Every other crate in the workspace depends on `dicalc-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Ncm` is a validated
//!    newtype — no bare strings for tariff codes. Malformed input is
//!    rejected at construction, never carried along.
//!
//! 2. **Closed variant sets.** `Uf` (the 27 federative units), `TaxKind`
//!    (the five import taxes) and `TaxRegime` are exhaustive enums.
//!    Adding a variant forces every consumer to handle it at compile time.
//!
//! 3. **Decimal-only money.** Every monetary amount is a
//!    `rust_decimal::Decimal`. Binary floating point never touches a
//!    tax figure.
//!
//! 4. **Absence is an error, not a zero.** Required monetary fields are
//!    `Option<Decimal>` on the wire records and resolved through checked
//!    accessors that fail with the field name and the addition identifier.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dicalc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod category;
pub mod declaration;
pub mod error;
pub mod layers;
pub mod money;
pub mod ncm;
pub mod regime;
pub mod tax;
pub mod uf;

// Re-export primary types for ergonomic imports.
pub use category::{Classification, ProductCategory};
pub use declaration::{Addition, Declaration, Importer, Product};
pub use error::EngineError;
pub use layers::CostLayers;
pub use ncm::Ncm;
pub use regime::{CreditPolicy, RegimeRules, TaxRegime};
pub use tax::TaxKind;
pub use uf::Uf;

//! # Custos Subcommand
//!
//! Computes the four-layer cost chain for every product of a
//! declaration and prints the per-addition breakdown with
//! declaration-wide totals, rounded to cents for presentation.

use std::path::PathBuf;

use clap::Args;

use dicalc_core::TaxRegime;
use dicalc_engine::{CalculationSession, DeclarationCosts};

use crate::common::{load_declaration, load_snapshot, print_json};

/// Arguments for the custos subcommand.
#[derive(Args, Debug)]
pub struct CustosArgs {
    /// Path to the declaration JSON document.
    #[arg(long)]
    pub declaracao: PathBuf,

    /// Tax regime of the importer (lucro-real, lucro-presumido,
    /// simples-nacional).
    #[arg(long)]
    pub regime: String,

    /// Incentive program code (e.g. SC_TTD_409); eligibility is checked
    /// and NF fields attached per addition when it passes.
    #[arg(long)]
    pub programa: Option<String>,

    /// Configuration YAML replacing the built-in tables.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Round every cost layer of the report for presentation.
fn rounded(mut costs: DeclarationCosts) -> DeclarationCosts {
    for addition in &mut costs.additions {
        addition.subtotal = addition.subtotal.rounded();
        for product in &mut addition.products {
            product.layers = product.layers.rounded();
        }
    }
    costs.totals = costs.totals.rounded();
    costs
}

/// Run the custos subcommand.
pub fn run(args: &CustosArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(args.config.as_deref())?;
    let declaration = load_declaration(&args.declaracao)?;
    let regime: TaxRegime = args.regime.parse().map_err(anyhow::Error::msg)?;

    let session = CalculationSession::new(&snapshot, regime);
    let costs = session.process(&declaration, args.programa.as_deref())?;
    print_json(&rounded(costs))
}

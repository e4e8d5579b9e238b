//! # Elegibilidade Subcommand
//!
//! Checks a list of NCMs against an incentive program's vedation
//! ruleset and prints the full eligibility report.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

use dicalc_core::{Ncm, Uf};
use dicalc_engine::IncentiveService;

use crate::common::{load_snapshot, print_json};

/// Arguments for the elegibilidade subcommand.
#[derive(Args, Debug)]
pub struct ElegibilidadeArgs {
    /// State granting the program (e.g. SC).
    #[arg(long)]
    pub uf: String,

    /// Program code (e.g. SC_TTD_409).
    #[arg(long)]
    pub programa: String,

    /// NCM to check; repeat for several.
    #[arg(long = "ncm")]
    pub ncms: Vec<String>,

    /// Configuration YAML replacing the built-in tables.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the elegibilidade subcommand.
pub fn run(args: &ElegibilidadeArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(args.config.as_deref())?;
    let uf = Uf::from_str(&args.uf)?;
    let ncms = args
        .ncms
        .iter()
        .map(|s| Ncm::parse(s))
        .collect::<Result<Vec<_>, _>>()?;

    let service = IncentiveService::new(&snapshot);
    let report = service.validate_eligibility(uf, &args.programa, &ncms)?;
    print_json(&report)
}

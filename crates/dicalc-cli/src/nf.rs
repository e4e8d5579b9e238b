//! # NF Subcommand
//!
//! Computes the ICMS deferral fields for one addition of a declaration
//! under an incentive program of the importer's state.

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;

use dicalc_engine::IncentiveService;

use crate::common::{load_declaration, load_snapshot, print_json};

/// Arguments for the nf subcommand.
#[derive(Args, Debug)]
pub struct NfArgs {
    /// Path to the declaration JSON document.
    #[arg(long)]
    pub declaracao: PathBuf,

    /// Addition number within the declaration.
    #[arg(long)]
    pub adicao: u32,

    /// Program code (e.g. SC_TTD_409).
    #[arg(long)]
    pub programa: String,

    /// Configuration YAML replacing the built-in tables.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the nf subcommand.
pub fn run(args: &NfArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(args.config.as_deref())?;
    let declaration = load_declaration(&args.declaracao)?;

    let Some(addition) = declaration
        .additions
        .iter()
        .find(|a| a.number == args.adicao)
    else {
        bail!(
            "declaration {} has no addition {}",
            declaration.numero_di,
            args.adicao
        );
    };

    let service = IncentiveService::new(&snapshot);
    let fields =
        service.calculate_nf_fields(addition, declaration.importer.uf, &args.programa)?;
    print_json(&fields)
}

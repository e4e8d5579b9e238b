//! # Reforma Subcommand
//!
//! Projects the reform transition schedule from a start year; with a
//! program, projects that program's effective-deferral erosion instead.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

use dicalc_core::Uf;
use dicalc_engine::ReformProjector;

use crate::common::{load_snapshot, print_json};

/// Arguments for the reforma subcommand.
#[derive(Args, Debug)]
pub struct ReformaArgs {
    /// First projected year.
    #[arg(long)]
    pub inicio: i32,

    /// Project the effective deferral of this program instead of the
    /// plain schedule. Requires --uf.
    #[arg(long, requires = "uf")]
    pub programa: Option<String>,

    /// State of the program given with --programa.
    #[arg(long)]
    pub uf: Option<String>,

    /// Configuration YAML replacing the built-in tables.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the reforma subcommand.
pub fn run(args: &ReformaArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(args.config.as_deref())?;
    let projector = ReformProjector::new(&snapshot)?;

    match (&args.programa, &args.uf) {
        (Some(code), Some(uf)) => {
            let uf = Uf::from_str(uf)?;
            let program = snapshot.program(uf, code)?;
            print_json(&projector.erosion(program, args.inicio)?)
        }
        _ => print_json(&projector.project(args.inicio)?),
    }
}

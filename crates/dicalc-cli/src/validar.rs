//! # Validar Subcommand
//!
//! Loads and validates a configuration YAML document, printing the
//! table sizes on success.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use dicalc_config::ConfigSnapshot;

use crate::common::print_json;

/// Arguments for the validar subcommand.
#[derive(Args, Debug)]
pub struct ValidarArgs {
    /// Configuration YAML document to validate.
    #[arg(long)]
    pub config: PathBuf,
}

/// Run the validar subcommand.
pub fn run(args: &ValidarArgs) -> anyhow::Result<()> {
    let snapshot = ConfigSnapshot::from_yaml_file(&args.config)?;
    print_json(&json!({
        "valid": true,
        "categories": snapshot.categories().len(),
        "programs": snapshot.programs().count(),
        "reform_years": snapshot.reform_schedule().len(),
    }))
}

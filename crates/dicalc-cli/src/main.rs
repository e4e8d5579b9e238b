//! # dicalc CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// DI cost and incentive engine.
///
/// Computes the four-layer import cost chain, checks state incentive
/// eligibility, emits NF deferral fields, and projects incentive
/// erosion under the tax-reform schedule.
#[derive(Parser, Debug)]
#[command(name = "dicalc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Cost layers for a whole declaration.
    Custos(dicalc_cli::custos::CustosArgs),
    /// Incentive program eligibility for a list of NCMs.
    Elegibilidade(dicalc_cli::elegibilidade::ElegibilidadeArgs),
    /// NF deferral fields for one addition.
    Nf(dicalc_cli::nf::NfArgs),
    /// Reform scenario projection.
    Reforma(dicalc_cli::reforma::ReformaArgs),
    /// Configuration document validation.
    Validar(dicalc_cli::validar::ValidarArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing. Diagnostics go to stderr; stdout carries the
    // JSON results only.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Custos(args) => dicalc_cli::custos::run(&args),
        Commands::Elegibilidade(args) => dicalc_cli::elegibilidade::run(&args),
        Commands::Nf(args) => dicalc_cli::nf::run(&args),
        Commands::Reforma(args) => dicalc_cli::reforma::run(&args),
        Commands::Validar(args) => dicalc_cli::validar::run(&args),
    }
}

//! # Shared Subcommand Helpers
//!
//! Snapshot and declaration loading used by every subcommand.

use std::path::Path;

use anyhow::Context;

use dicalc_config::ConfigSnapshot;
use dicalc_core::Declaration;

/// Load the configuration snapshot: an explicit YAML document when
/// given, the built-in tables otherwise.
pub fn load_snapshot(config: Option<&Path>) -> anyhow::Result<ConfigSnapshot> {
    match config {
        Some(path) => ConfigSnapshot::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(ConfigSnapshot::builtin()),
    }
}

/// Load a declaration from a JSON document.
pub fn load_declaration(path: &Path) -> anyhow::Result<Declaration> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("reading declaration from {}", path.display()))?;
    serde_json::from_str(&input)
        .with_context(|| format!("parsing declaration from {}", path.display()))
}

/// Print a serializable value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Validate command implementation.

use anyhow::{bail, Context, Result};
use cloudlets_rules::{MatchRules, Validate};
use std::fs;
use tracing::info;

/// Runs the validate command.
pub fn run(rules_path: &str) -> Result<()> {
    let content = fs::read_to_string(rules_path)
        .with_context(|| format!("Failed to read rules file: {rules_path}"))?;

    let rules: MatchRules = serde_json::from_str(&content)
        .with_context(|| format!("Failed to decode rules file: {rules_path}"))?;

    info!("Decoded {} match rules", rules.len());

    match rules.validate() {
        Ok(()) => {
            println!("{rules_path}: {} rules, no violations", rules.len());
            Ok(())
        }
        Err(errors) => {
            for violation in errors.violations() {
                eprintln!("{}: {}", violation.field, violation.message);
            }
            bail!(
                "{rules_path}: {} violations",
                errors.violations().len()
            )
        }
    }
}

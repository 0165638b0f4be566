//! Inspect command implementation.

use anyhow::{Context, Result};
use cloudlets_rules::MatchRules;
use std::fs;

/// Runs the inspect command.
pub fn run(rules_path: &str) -> Result<()> {
    let content = fs::read_to_string(rules_path)
        .with_context(|| format!("Failed to read rules file: {rules_path}"))?;

    let rules: MatchRules = serde_json::from_str(&content)
        .with_context(|| format!("Failed to decode rules file: {rules_path}"))?;

    println!("{rules_path}: {} rules", rules.len());
    for (index, rule) in rules.iter().enumerate() {
        let name = rule.name().unwrap_or("<unnamed>");
        let disabled = if rule.is_disabled() { " (disabled)" } else { "" };
        println!(
            "  [{index}] {} {name}: {} criteria{disabled}",
            rule.cloudlet_type(),
            rule.criteria_count()
        );
    }
    Ok(())
}

//! Cloudlets CLI - offline tooling for match-rule files.
//!
//! Commands:
//! - `cloudlets validate` - Decode and validate a match-rules JSON file
//! - `cloudlets inspect` - Print a per-rule summary of a match-rules file

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cloudlets")]
#[command(about = "Offline tooling for Akamai Cloudlets match-rule files")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a match-rules JSON file and report every validation violation
    Validate {
        /// Path to the match-rules JSON file
        #[arg(default_value = "match-rules.json")]
        rules: String,
    },

    /// Decode a match-rules JSON file and print a per-rule summary
    Inspect {
        /// Path to the match-rules JSON file
        #[arg(default_value = "match-rules.json")]
        rules: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Validate { rules } => commands::validate::run(&rules),
        Commands::Inspect { rules } => commands::inspect::run(&rules),
    }
}

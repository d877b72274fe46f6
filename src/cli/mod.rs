//! CLI interface using clap
//!
//! Provides the command-line interface for docscribe

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Docscribe - Function inventory and documentation sync
#[derive(Parser, Debug)]
#[command(name = "docscribe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the project root (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inventory the functions of the source tree
    Analyze(AnalyzeArgs),

    /// Regenerate documentation for functions changed in the latest commit
    Sync(SyncArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for analyze command
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Number of files to show in the per-file ranking
    #[arg(short, long, default_value = "5")]
    pub top: usize,
}

/// Arguments for sync command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// API key for the generation service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Document to patch (overrides the configured path)
    #[arg(long)]
    pub doc: Option<PathBuf>,

    /// Select and extract without generating or patching
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["docscribe", "analyze", "--top", "10"]);
        assert!(matches!(cli.command, Commands::Analyze(_)));

        if let Commands::Analyze(args) = cli.command {
            assert_eq!(args.top, 10);
        }
    }

    #[test]
    fn test_sync_command() {
        let cli = Cli::parse_from(["docscribe", "sync", "--dry-run"]);
        if let Commands::Sync(args) = cli.command {
            assert!(args.dry_run);
        } else {
            panic!("expected sync command");
        }
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::parse_from(["docscribe", "-o", "json", "analyze"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }
}

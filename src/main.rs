//! Docscribe - Function inventory and documentation sync tool
//!
//! Inventories the functions of a JavaScript/TypeScript source tree and keeps
//! marker-delimited regions of a Markdown document in sync with the exported
//! functions touched by the latest commit.

use anyhow::Result;
use clap::Parser;
use docscribe::cli::{analyze, show_config, sync, Cli, Commands};
use docscribe::config::Config;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Get project root
    let root = Path::new(&cli.path);

    // Execute command
    match cli.command {
        Commands::Analyze(args) => {
            let config = Config::load_or_default(root)?;
            analyze(root, &config, args.top, cli.format)?;
        }

        Commands::Sync(args) => {
            let mut config = Config::load_or_default(root)?;
            config.api_key = args.api_key;
            if let Some(doc) = args.doc {
                config.doc_path = doc;
            }

            // A fatal error here carries a non-zero exit status
            sync(root, &config, args.dry_run, cli.format).await?;
        }

        Commands::Config(_args) => {
            let config = Config::load_or_default(root)?;
            show_config(&config);
        }
    }

    Ok(())
}

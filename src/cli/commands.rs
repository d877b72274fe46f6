//! Command implementations

use crate::analysis::{render_report, summarize, FileAnalysis};
use crate::config::Config;
use crate::discover;
use crate::extract::{extract_functions, SourceParser};
use crate::llm::GenerationClient;
use crate::repo::{select_changed_files, Repository, Selection};
use crate::sync::{self, DocumentPatcher, SyncSummary};
use anyhow::Result;
use std::path::Path;

use super::OutputFormat;

/// Inventory the functions of the source tree and print a report
pub fn analyze(root: &Path, config: &Config, top: usize, format: OutputFormat) -> Result<()> {
    let files = discover::source_files(root, config)?;
    let mut parser = SourceParser::new()?;
    let mut analyses = Vec::new();

    for file in &files {
        let path = file.display().to_string();

        let analysis = match std::fs::read_to_string(root.join(file)) {
            Ok(content) => match parser.parse(&content) {
                Ok(tree) => FileAnalysis::success(
                    &path,
                    extract_functions(&tree, &content),
                    content.lines().count(),
                    content.len(),
                ),
                Err(e) => FileAnalysis::failed(&path, e.to_string()),
            },
            Err(e) => FileAnalysis::failed(&path, e.to_string()),
        };

        analyses.push(analysis);
    }

    match format {
        OutputFormat::Text => print!("{}", render_report(&analyses, top)),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": summarize(&analyses),
                "files": analyses,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Regenerate documentation for the functions changed in the latest commit
pub async fn sync(
    root: &Path,
    config: &Config,
    dry_run: bool,
    format: OutputFormat,
) -> Result<SyncSummary> {
    // Credential problems must surface before any network call or file work
    if !dry_run && config.api_key.is_none() {
        return Err(crate::error::SyncError::MissingCredential.into());
    }

    let history = Repository::discover(root);
    let selection = select_changed_files(&history, config, || discover::source_files(root, config))?;

    if let Selection::DiffFailed(warning) = &selection {
        tracing::warn!("change selection failed, documenting nothing: {}", warning);
    } else {
        tracing::info!("selection: {}", selection);
    }

    let plan = sync::plan(root, selection.files())?;

    if dry_run {
        for snippet in &plan.snippets {
            println!("would document {} from {}", snippet.name, snippet.file_path);
        }
        return Ok(SyncSummary {
            skipped_files: plan.skipped_files.clone(),
            ..Default::default()
        });
    }

    let client = GenerationClient::new(config)?;
    let mut patcher = DocumentPatcher::new(root.join(&config.doc_path));
    let summary = sync::execute(&plan, config, &client, &mut patcher).await?;

    match format {
        OutputFormat::Text => {
            println!("Documented functions: {}", summary.documented.len());
            for name in &summary.documented {
                println!("  ✓ {}", name);
            }
            for name in &summary.missing_regions {
                println!("  - {} (no marker region)", name);
            }
            for name in &summary.duplicate_regions {
                println!("  - {} (duplicate marker region)", name);
            }
            for skipped in &summary.skipped_files {
                println!("  ! {}: {}", skipped.path, skipped.error);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(summary)
}

/// Print the effective configuration
pub fn show_config(config: &Config) {
    println!("Docscribe Configuration");
    println!("=======================\n");

    println!("Model: {}", config.model);
    println!("Document: {:?}", config.doc_path);
    println!("Source dir: {}", config.source_dir);
    println!("Extensions: {:?}", config.extensions);
    println!("Excluded dirs: {:?}", config.exclude_dirs);
    println!("Excluded file fragments: {:?}", config.exclude_file_fragments);
    println!("Max attempts: {}", config.max_attempts);
    println!("Base delay: {}ms", config.base_delay_ms);
    println!("Temperature: {}", config.temperature);
    println!("Max output tokens: {}", config.max_output_tokens);
    println!(
        "API key: {}",
        if config.api_key.is_some() {
            "configured"
        } else {
            "not set"
        }
    );
}

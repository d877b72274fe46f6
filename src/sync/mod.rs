//! Change-driven documentation synchronization
//!
//! The pipeline: select changed files, extract their exported functions,
//! generate prose for each and splice it into the document's marker regions.
//! Per-file read and parse failures are recorded and skipped; fatal
//! generation failures abort the remaining work.

pub mod patcher;

pub use patcher::{DocumentPatcher, PatchOutcome};

use crate::config::Config;
use crate::extract::{extract_exported, ExportedFunctionSnippet, SourceParser};
use crate::llm::{build_prompt, GenerationClient, GenerationRequest, Transport};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a run intends to document
#[derive(Debug)]
pub struct SyncPlan {
    /// Exported functions in file order
    pub snippets: Vec<ExportedFunctionSnippet>,
    /// Files skipped with their per-file errors
    pub skipped_files: Vec<SkippedFile>,
}

/// A file the run could not analyze
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub error: String,
}

/// Outcome of an executed run
#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncSummary {
    /// Functions whose regions were rewritten
    pub documented: Vec<String>,
    /// Functions with no marker region in the document
    pub missing_regions: Vec<String>,
    /// Functions whose sentinels appear more than once
    pub duplicate_regions: Vec<String>,
    /// Files skipped during planning
    pub skipped_files: Vec<SkippedFile>,
}

/// Read, parse and extract the selected files into a plan
///
/// Unreadable or malformed files are warnings; the batch continues.
pub fn plan(root: &Path, files: &[PathBuf]) -> Result<SyncPlan> {
    let mut parser = SourceParser::new()?;
    let mut snippets = Vec::new();
    let mut skipped_files = Vec::new();

    for file in files {
        let full = root.join(file);

        let content = match std::fs::read_to_string(&full) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("skipping unreadable file {:?}: {}", file, e);
                skipped_files.push(SkippedFile {
                    path: file.display().to_string(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let tree = match parser.parse(&content) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("skipping malformed file {:?}: {}", file, e);
                skipped_files.push(SkippedFile {
                    path: file.display().to_string(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        snippets.extend(extract_exported(&tree, &content, &file.to_string_lossy()));
    }

    Ok(SyncPlan {
        snippets,
        skipped_files,
    })
}

/// Generate documentation for every planned function and patch the document
///
/// One function at a time: each patch re-reads the document, so regions never
/// race. A fatal generation failure aborts the remaining functions.
pub async fn execute<T: Transport>(
    plan: &SyncPlan,
    config: &Config,
    client: &GenerationClient<T>,
    patcher: &mut DocumentPatcher,
) -> Result<SyncSummary> {
    let mut summary = SyncSummary {
        skipped_files: plan.skipped_files.clone(),
        ..Default::default()
    };

    for snippet in &plan.snippets {
        let request = GenerationRequest {
            prompt: build_prompt(snippet),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        };

        let text = client.generate(&request).await?;

        match patcher.apply(&snippet.name, &text)? {
            PatchOutcome::Patched => {
                tracing::info!("documented {}", snippet.name);
                summary.documented.push(snippet.name.clone());
            }
            PatchOutcome::RegionNotFound => {
                tracing::warn!("no marker region for {}, skipping", snippet.name);
                summary.missing_regions.push(snippet.name.clone());
            }
            PatchOutcome::DuplicateRegion => {
                tracing::warn!("duplicate marker region for {}, skipping", snippet.name);
                summary.duplicate_regions.push(snippet.name.clone());
            }
        }
    }

    Ok(summary)
}

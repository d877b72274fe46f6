//! Aggregation of per-file extraction results
//!
//! Pure fold of ordered [`FileAnalysis`] values into an [`AnalysisSummary`]
//! plus a rendered report. No I/O happens here; summaries are recomputed on
//! every run and never persisted.

use crate::extract::{FunctionKind, FunctionRecord};
use serde::Serialize;

/// Extraction result for a single input file
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    /// File path as given by discovery
    pub path: String,
    /// Function records in document order
    pub functions: Vec<FunctionRecord>,
    /// Number of functions found
    pub function_count: usize,
    /// Number of lines in the file
    pub line_count: usize,
    /// File size in bytes
    pub byte_size: usize,
    /// Per-file failure; when set, all counts are zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileAnalysis {
    /// Build a successful analysis
    pub fn success(
        path: impl Into<String>,
        functions: Vec<FunctionRecord>,
        line_count: usize,
        byte_size: usize,
    ) -> Self {
        let function_count = functions.len();
        Self {
            path: path.into(),
            functions,
            function_count,
            line_count,
            byte_size,
            error: None,
        }
    }

    /// Build a failed analysis carrying the per-file error
    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            functions: Vec::new(),
            function_count: 0,
            line_count: 0,
            byte_size: 0,
            error: Some(error.into()),
        }
    }

    /// Whether the file was analyzed without error
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate over a batch of file analyses
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisSummary {
    /// Total number of input files
    pub total_files: usize,
    /// Files parsed without error
    pub parsed_files: usize,
    /// Functions across all parsed files
    pub total_functions: usize,
    /// Lines across all parsed files
    pub total_lines: usize,
    /// Bytes across all parsed files
    pub total_bytes: usize,
    /// Per-file failures, in input order
    pub failures: Vec<FailureEntry>,
}

/// One recorded per-file failure
#[derive(Debug, Clone, Serialize)]
pub struct FailureEntry {
    pub path: String,
    pub error: String,
}

/// Fold analyses into a summary; errored files contribute nothing to totals
pub fn summarize(analyses: &[FileAnalysis]) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        total_files: analyses.len(),
        ..Default::default()
    };

    for analysis in analyses {
        match &analysis.error {
            Some(error) => summary.failures.push(FailureEntry {
                path: analysis.path.clone(),
                error: error.clone(),
            }),
            None => {
                summary.parsed_files += 1;
                summary.total_functions += analysis.function_count;
                summary.total_lines += analysis.line_count;
                summary.total_bytes += analysis.byte_size;
            }
        }
    }

    summary
}

/// Count functions of each kind across all parsed files
fn kind_breakdown(analyses: &[FileAnalysis]) -> [(FunctionKind, usize); 4] {
    let mut counts = [
        (FunctionKind::Declaration, 0),
        (FunctionKind::Arrow, 0),
        (FunctionKind::Expression, 0),
        (FunctionKind::Method, 0),
    ];

    for analysis in analyses.iter().filter(|a| a.is_ok()) {
        for record in &analysis.functions {
            for entry in counts.iter_mut() {
                if entry.0 == record.kind {
                    entry.1 += 1;
                }
            }
        }
    }

    counts
}

/// Render the human-readable report
///
/// Ties in the top-files ranking are broken by input order.
pub fn render_report(analyses: &[FileAnalysis], top_n: usize) -> String {
    let summary = summarize(analyses);
    let mut report = String::new();

    report.push_str("Source Analysis Report\n");
    report.push_str("======================\n\n");

    report.push_str(&format!("Files scanned: {}\n", summary.total_files));
    report.push_str(&format!("Parsed successfully: {}\n", summary.parsed_files));
    report.push_str(&format!("Functions found: {}\n", summary.total_functions));
    report.push_str(&format!("Total lines: {}\n", summary.total_lines));
    report.push_str(&format!("Total size: {} bytes\n", summary.total_bytes));

    report.push_str("\nFunctions by kind:\n");
    for (kind, count) in kind_breakdown(analyses) {
        report.push_str(&format!("  {}: {}\n", kind, count));
    }

    let mut ranked: Vec<&FileAnalysis> = analyses.iter().filter(|a| a.is_ok()).collect();
    // Stable sort keeps input order for equal counts
    ranked.sort_by(|a, b| b.function_count.cmp(&a.function_count));

    report.push_str(&format!("\nTop {} files by function count:\n", top_n));
    for (i, analysis) in ranked.iter().take(top_n).enumerate() {
        report.push_str(&format!(
            "  {}. {} ({})\n",
            i + 1,
            analysis.path,
            analysis.function_count
        ));
    }

    if !summary.failures.is_empty() {
        report.push_str("\nErrors:\n");
        for failure in &summary.failures {
            report.push_str(&format!("  - {}: {}\n", failure.path, failure.error));
        }
    }

    report
}

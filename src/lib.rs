//! Docscribe - Function inventory and change-driven documentation sync
//!
//! This library provides the core functionality for inventorying the functions
//! of a JavaScript/TypeScript source tree and for keeping marker-delimited
//! regions of a Markdown document in sync with the exported functions touched
//! by the latest commit.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod llm;
pub mod repo;
pub mod sync;

/// Re-export commonly used types
pub use analysis::{AnalysisSummary, FileAnalysis};
pub use config::Config;
pub use error::SyncError;
pub use extract::{ExportedFunctionSnippet, FunctionKind, FunctionRecord, SourceParser};
pub use repo::Repository;

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docscribe";

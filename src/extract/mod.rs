//! Syntax-tree analysis of JavaScript/TypeScript sources
//!
//! This module handles:
//! - Parsing source text over the permissive TSX grammar superset
//! - Extracting function-like constructs into normalized records
//! - Capturing exported function snippets for documentation sync

pub mod functions;
pub mod parser;

pub use functions::{
    extract_exported, extract_functions, ExportedFunctionSnippet, FunctionKind, FunctionRecord,
    MethodKind,
};
pub use parser::{ParseError, SourceParser};

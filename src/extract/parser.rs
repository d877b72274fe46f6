//! Source parsing using tree-sitter
//!
//! A single TSX parser covers the whole input surface: module syntax,
//! TypeScript extensions, decorators and JSX. Malformed input is classified
//! as a recoverable [`ParseError`], never a process-aborting fault.

use anyhow::{Context, Result};
use tree_sitter::{Node, Tree};

/// Recoverable parse failure for one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Diagnostic message describing the failure
    pub message: String,
    /// 1-based line of the first offending node, when located
    pub line: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {})", self.message, line),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses source text into syntax trees
pub struct SourceParser {
    parser: tree_sitter::Parser,
}

impl SourceParser {
    /// Create a new parser configured for the TSX grammar
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
            .context("Failed to set TSX language")?;

        Ok(Self { parser })
    }

    /// Parse source text into a syntax tree
    ///
    /// Pure transform of text to tree. Malformed but readable text yields a
    /// [`ParseError`] carrying the location of the first syntax error.
    pub fn parse(&mut self, source: &str) -> std::result::Result<Tree, ParseError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| ParseError {
            message: "parser produced no tree".to_string(),
            line: None,
        })?;

        if tree.root_node().has_error() {
            return Err(first_error(tree.root_node()));
        }

        Ok(tree)
    }
}

/// Locate the first error or missing node in document order
fn first_error(node: Node) -> ParseError {
    if node.is_error() || node.is_missing() {
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_string()
        };
        return ParseError {
            message,
            line: Some(node.start_position().row + 1),
        };
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            return first_error(child);
        }
    }

    // has_error() on the root without a locatable error node
    ParseError {
        message: "syntax error".to_string(),
        line: Some(node.start_position().row + 1),
    }
}

//! Function inventory over parsed syntax trees
//!
//! The walk visits every child of every node; a dispatch on node kind decides
//! whether a node is *recorded*, never whether it is descended into, so
//! functions nested inside other functions are always discovered.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

/// Kind of function-like construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Declaration,
    Arrow,
    Expression,
    Method,
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionKind::Declaration => write!(f, "declaration"),
            FunctionKind::Arrow => write!(f, "arrow"),
            FunctionKind::Expression => write!(f, "expression"),
            FunctionKind::Method => write!(f, "method"),
        }
    }
}

/// Role of a method definition within its class or object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Method,
    Constructor,
    Get,
    Set,
}

/// Normalized metadata for one function-like construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Kind of construct
    pub kind: FunctionKind,
    /// Declared name; absent for arrow and function expressions
    pub name: Option<String>,
    /// 1-based line where the construct starts
    pub source_line: Option<usize>,
    /// Whether the construct carries the async modifier
    pub is_async: bool,
    /// Whether the construct is a generator
    pub is_generator: bool,
    /// Number of declared positional parameters
    pub param_count: usize,
    /// Method role; present only for `kind == Method`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_kind: Option<MethodKind>,
}

impl FunctionRecord {
    /// Name for display, falling back to "anonymous"
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }
}

/// An exported function declaration with its exact source span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFunctionSnippet {
    /// Declared function name
    pub name: String,
    /// Exact substring of the original text spanning the declaration
    pub source_text: String,
    /// File the declaration came from
    pub file_path: String,
}

/// Extract all function records from a tree in document order
pub fn extract_functions(tree: &Tree, source: &str) -> Vec<FunctionRecord> {
    let mut records = Vec::new();
    walk(tree.root_node(), source, &mut records);
    records
}

/// Pre-order walk over every child; the dispatch only decides recording
fn walk(node: Node, source: &str, records: &mut Vec<FunctionRecord>) {
    if let Some(record) = record_for(node, source) {
        records.push(record);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, records);
    }
}

/// Dispatch table: map a node kind to a function record, or nothing
fn record_for(node: Node, source: &str) -> Option<FunctionRecord> {
    let kind = match node.kind() {
        "function_declaration" | "generator_function_declaration" => FunctionKind::Declaration,
        "arrow_function" => FunctionKind::Arrow,
        "function_expression" | "generator_function" => FunctionKind::Expression,
        "method_definition" => FunctionKind::Method,
        _ => return None,
    };

    let name = match kind {
        FunctionKind::Declaration => node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
            .map(|s| s.to_string()),
        // Arrow and function expressions are never named from binding context
        FunctionKind::Arrow | FunctionKind::Expression => None,
        FunctionKind::Method => node
            .child_by_field_name("name")
            .map(|n| method_name(n, source)),
    };

    let method_kind = match kind {
        FunctionKind::Method => Some(method_kind_of(node, name.as_deref())),
        _ => None,
    };

    Some(FunctionRecord {
        kind,
        name,
        source_line: Some(node.start_position().row + 1),
        is_async: has_token(node, "async"),
        is_generator: has_token(node, "*"),
        param_count: count_params(node),
        method_kind,
    })
}

/// Property key as a name when statically known, "computed" otherwise
fn method_name(name_node: Node, source: &str) -> String {
    match name_node.kind() {
        "computed_property_name" => "computed".to_string(),
        "string" => name_node
            .utf8_text(source.as_bytes())
            .map(|s| s.trim_matches(|c| c == '"' || c == '\'').to_string())
            .unwrap_or_else(|_| "computed".to_string()),
        _ => name_node
            .utf8_text(source.as_bytes())
            .map(|s| s.to_string())
            .unwrap_or_else(|_| "computed".to_string()),
    }
}

/// Method role from the definition's own modifiers
fn method_kind_of(node: Node, name: Option<&str>) -> MethodKind {
    if has_token(node, "get") {
        return MethodKind::Get;
    }
    if has_token(node, "set") {
        return MethodKind::Set;
    }
    if name == Some("constructor") {
        return MethodKind::Constructor;
    }
    MethodKind::Method
}

/// Check for an anonymous modifier token among direct children
fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

/// Count declared positional parameters
///
/// Default-valued and rest parameters count by presence. Single-identifier
/// arrow parameters sit under a `parameter` field instead of a list.
fn count_params(node: Node) -> usize {
    if let Some(params) = node.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .count()
    } else if node.child_by_field_name("parameter").is_some() {
        1
    } else {
        0
    }
}

/// Extract exported function declarations at the top level of the module
///
/// Only direct `export` statements of named function declarations qualify;
/// the exported declaration is not descended into for further matches.
pub fn extract_exported(tree: &Tree, source: &str, file_path: &str) -> Vec<ExportedFunctionSnippet> {
    let root = tree.root_node();
    let mut snippets = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "export_statement" {
            continue;
        }
        if let Some(snippet) = exported_snippet(child, source, file_path) {
            snippets.push(snippet);
        }
    }

    snippets
}

/// Snippet for one export statement, when it exports a named function declaration
fn exported_snippet(node: Node, source: &str, file_path: &str) -> Option<ExportedFunctionSnippet> {
    let decl = node.child_by_field_name("declaration")?;

    if !matches!(
        decl.kind(),
        "function_declaration" | "generator_function_declaration"
    ) {
        return None;
    }

    let name_node = decl.child_by_field_name("name")?;
    let name = name_node.utf8_text(source.as_bytes()).ok()?;
    let source_text = decl.utf8_text(source.as_bytes()).ok()?;

    Some(ExportedFunctionSnippet {
        name: name.to_string(),
        source_text: source_text.to_string(),
        file_path: file_path.to_string(),
    })
}

//! Tree-sitter based lookup for brace-delimited sources.
//!
//! Brace-family languages are whitespace-insensitive, so callers splice
//! replacements at the returned byte spans without reindentation.

use std::ops::Range;

use tree_sitter::{Language, Parser, Tree};

use crate::error::AstError;
use crate::python::{node_name, visit};

/// Tree-sitter based JavaScript parser.
///
/// TypeScript sources are parsed with the same grammar on a best-effort
/// basis; annotated code that the grammar rejects simply falls through to
/// the callers' append path.
pub struct JsParser {
    parser: Parser,
}

impl JsParser {
    /// Create a new parser with the JavaScript grammar loaded.
    ///
    /// # Errors
    /// Returns an error when the grammar is incompatible with the linked
    /// tree-sitter runtime.
    pub fn new() -> Result<Self, AstError> {
        let language: Language = tree_sitter_javascript::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        Ok(Self { parser })
    }

    /// Parse source text into a tree.
    ///
    /// # Errors
    /// Returns `AstError::Parse` when the parser yields no tree.
    pub fn parse(&mut self, code: &str) -> Result<Tree, AstError> {
        self.parser.parse(code, None).ok_or(AstError::Parse)
    }

    /// Whether the source parses without `ERROR` or missing nodes.
    pub fn is_valid(&mut self, code: &str) -> bool {
        match self.parse(code) {
            Ok(tree) => !tree.root_node().has_error(),
            Err(_) => false,
        }
    }

    /// Find a function declaration by name. The last declaration wins.
    pub fn find_function(&mut self, code: &str, name: &str) -> Option<Range<usize>> {
        let tree = self.parse(code).ok()?;
        let mut found = None;
        visit(tree.root_node(), &mut |node| {
            if matches!(
                node.kind(),
                "function_declaration" | "generator_function_declaration"
            ) && node_name(node, code) == Some(name)
            {
                found = Some(node.start_byte()..node.end_byte());
            }
        });
        found
    }

    /// Find a class declaration by name. The last declaration wins.
    pub fn find_class(&mut self, code: &str, name: &str) -> Option<Range<usize>> {
        let tree = self.parse(code).ok()?;
        let mut found = None;
        visit(tree.root_node(), &mut |node| {
            if node.kind() == "class_declaration" && node_name(node, code) == Some(name) {
                found = Some(node.start_byte()..node.end_byte());
            }
        });
        found
    }

    /// Find a method by name inside the named class.
    pub fn find_method(&mut self, code: &str, class: &str, method: &str) -> Option<Range<usize>> {
        let tree = self.parse(code).ok()?;
        let mut class_node = None;
        visit(tree.root_node(), &mut |node| {
            if node.kind() == "class_declaration" && node_name(node, code) == Some(class) {
                class_node = Some(node);
            }
        });
        let body = class_node?.child_by_field_name("body")?;
        let mut found = None;
        visit(body, &mut |node| {
            if node.kind() == "method_definition" && node_name(node, code) == Some(method) {
                found = Some(node.start_byte()..node.end_byte());
            }
        });
        found
    }
}

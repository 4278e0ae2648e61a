//! Tree-sitter based Python parser for locating functions, methods and
//! classes by name.
//!
//! Spans returned by the finders include any wrapping decorators, so a
//! decorated definition is addressed from its first `@` line.

use std::ops::Range;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::AstError;

/// Tree-sitter based Python parser.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new parser with the Python grammar loaded.
    ///
    /// # Errors
    /// Returns an error when the grammar is incompatible with the linked
    /// tree-sitter runtime.
    pub fn new() -> Result<Self, AstError> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
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

    /// Line (1-indexed) of the first syntax error, if any.
    pub fn first_error_line(&mut self, code: &str) -> Option<usize> {
        let tree = self.parse(code).ok()?;
        let root = tree.root_node();
        if !root.has_error() {
            return None;
        }
        let mut line = None;
        visit(root, &mut |node| {
            if line.is_none() && (node.is_error() || node.is_missing()) {
                line = Some(node.start_position().row + 1);
            }
        });
        line.or(Some(1))
    }

    /// Find a module-level (non-method) function by name.
    ///
    /// When several definitions share the name, the last one wins, matching
    /// how re-declarations shadow earlier ones.
    pub fn find_function(&mut self, code: &str, name: &str) -> Option<Range<usize>> {
        let tree = self.parse(code).ok()?;
        let mut found = None;
        visit(tree.root_node(), &mut |node| {
            if node.kind() == "function_definition"
                && node_name(node, code) == Some(name)
                && !inside_class(node)
            {
                found = Some(span_with_decorators(node));
            }
        });
        found
    }

    /// Find a class definition by name. The last definition wins.
    pub fn find_class(&mut self, code: &str, name: &str) -> Option<Range<usize>> {
        let tree = self.parse(code).ok()?;
        let mut found = None;
        visit(tree.root_node(), &mut |node| {
            if node.kind() == "class_definition" && node_name(node, code) == Some(name) {
                found = Some(span_with_decorators(node));
            }
        });
        found
    }

    /// Find a method by name inside the named class. The last matching
    /// definition inside the last matching class wins.
    pub fn find_method(&mut self, code: &str, class: &str, method: &str) -> Option<Range<usize>> {
        let tree = self.parse(code).ok()?;
        let mut class_node = None;
        visit(tree.root_node(), &mut |node| {
            if node.kind() == "class_definition" && node_name(node, code) == Some(class) {
                class_node = Some(node);
            }
        });
        let body = class_node?.child_by_field_name("body")?;
        let mut found = None;
        visit(body, &mut |node| {
            if node.kind() == "function_definition" && node_name(node, code) == Some(method) {
                found = Some(span_with_decorators(node));
            }
        });
        found
    }
}

/// Depth-first walk invoking `f` on every named node.
pub(crate) fn visit<'t>(node: Node<'t>, f: &mut dyn FnMut(Node<'t>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, f);
    }
}

/// Text of a node's `name` field.
pub(crate) fn node_name<'c>(node: Node<'_>, code: &'c str) -> Option<&'c str> {
    node.child_by_field_name("name")?.utf8_text(code.as_bytes()).ok()
}

/// Byte span of a definition, widened to its `decorated_definition`
/// wrapper when one exists.
pub(crate) fn span_with_decorators(node: Node<'_>) -> Range<usize> {
    match node.parent() {
        Some(parent) if parent.kind() == "decorated_definition" => {
            parent.start_byte()..parent.end_byte()
        }
        _ => node.start_byte()..node.end_byte(),
    }
}

fn inside_class(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        if n.kind() == "class_definition" {
            return true;
        }
        current = n.parent();
    }
    false
}

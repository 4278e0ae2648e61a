//! Structured extraction of class features.
//!
//! Parses one class's source into fields, categorized methods and inner
//! classes, so the merge engine can diff two versions of a class and
//! re-emit members independently.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use tree_sitter::Node;

use crate::error::AstError;
use crate::python::{PythonParser, node_name};

/// One indentation step, as stored in normalized method bodies.
const INDENT: &str = "    ";

/// A class-level field (annotated or plain assignment in the class body).
///
/// Identity is keyed on `name` only, so two fields with the same name are
/// "the same field" regardless of annotation or default. This enables
/// diffing by name.
#[derive(Debug, Clone)]
pub struct ClassField {
    /// Field name.
    pub name: String,
    /// Type annotation text, if any.
    pub type_annotation: Option<String>,
    /// Default value text, if any.
    pub default_value: Option<String>,
}

impl ClassField {
    /// Whether annotation or default value changed relative to `other`.
    #[must_use]
    pub fn differs_from(&self, other: &Self) -> bool {
        self.type_annotation != other.type_annotation || self.default_value != other.default_value
    }

    /// Render the field as a class-body line without indentation.
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = self.name.clone();
        if let Some(ty) = &self.type_annotation {
            line.push_str(": ");
            line.push_str(ty);
        }
        if let Some(value) = &self.default_value {
            line.push_str(" = ");
            line.push_str(value);
        }
        line
    }
}

impl PartialEq for ClassField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassField {}

impl Hash for ClassField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A method extracted from a class body.
///
/// Identity is keyed on `name` only; `differs_from` compares the full
/// shape. `body` is stored dedented with one 4-space level so re-emission
/// is a pure reindent.
#[derive(Debug, Clone)]
pub struct ClassMethod {
    /// Method name.
    pub name: String,
    /// Definition line, e.g. `def run(self, x: int) -> int:`.
    pub signature: String,
    /// Dedented body text, first level at 4 spaces.
    pub body: String,
    /// Whether the method is a property accessor.
    pub is_property: bool,
    /// Decorator texts without the leading `@`.
    pub decorators: Vec<String>,
}

impl ClassMethod {
    /// Whether signature, body or decorator list changed relative to `other`.
    #[must_use]
    pub fn differs_from(&self, other: &Self) -> bool {
        self.signature != other.signature
            || self.body != other.body
            || self.decorators != other.decorators
    }
}

impl PartialEq for ClassMethod {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassMethod {}

impl Hash for ClassMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Complete set of features extracted from one class.
#[derive(Debug, Clone)]
pub struct ClassFeatures {
    /// Class name.
    pub name: String,
    /// Class-level decorator texts without the leading `@`.
    pub decorators: Vec<String>,
    /// Base class expressions, in declaration order.
    pub base_classes: Vec<String>,
    /// Docstring text (quotes included), dedented past the first line.
    pub docstring: Option<String>,
    /// Fields in source order.
    pub fields: Vec<ClassField>,
    /// Plain methods.
    pub methods: HashSet<ClassMethod>,
    /// Double-underscore methods.
    pub dunder_methods: HashSet<ClassMethod>,
    /// Property accessors (`@property`, `.setter`, `.deleter`).
    pub properties: HashSet<ClassMethod>,
    /// `@classmethod` methods.
    pub class_methods: HashSet<ClassMethod>,
    /// `@staticmethod` methods.
    pub static_methods: HashSet<ClassMethod>,
    /// Every method in source order, across all categories.
    pub all_methods: Vec<ClassMethod>,
    /// Nested class definitions.
    pub inner_classes: Vec<ClassFeatures>,
}

impl ClassFeatures {
    /// Names of all methods, across categories.
    #[must_use]
    pub fn method_names(&self) -> HashSet<&str> {
        self.all_methods.iter().map(|m| m.name.as_str()).collect()
    }

    /// The class declaration line, e.g. `class Widget(Base):`.
    #[must_use]
    pub fn declaration(&self) -> String {
        if self.base_classes.is_empty() {
            format!("class {}:", self.name)
        } else {
            format!("class {}({}):", self.name, self.base_classes.join(", "))
        }
    }
}

/// Extract features from the first class definition in `code`.
///
/// # Errors
/// Returns `AstError::MissingClass` when the snippet declares no class,
/// and parse/grammar errors from the underlying parser.
pub fn extract_class_features(code: &str) -> Result<ClassFeatures, AstError> {
    let mut parser = PythonParser::new()?;
    let tree = parser.parse(code)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        let node = unwrap_decorated(child);
        if node.kind() == "class_definition" {
            let decorators = if child.kind() == "decorated_definition" {
                collect_decorators(child, code)
            } else {
                Vec::new()
            };
            return Ok(extract_from_node(node, code, decorators));
        }
    }
    Err(AstError::MissingClass)
}

/// Peel a `decorated_definition` down to the wrapped definition.
fn unwrap_decorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

fn extract_from_node(class_node: Node<'_>, code: &str, decorators: Vec<String>) -> ClassFeatures {
    let name = node_name(class_node, code).unwrap_or_default().to_string();

    let mut base_classes = Vec::new();
    if let Some(supers) = class_node.child_by_field_name("superclasses") {
        let mut cursor = supers.walk();
        for base in supers.named_children(&mut cursor) {
            if let Ok(text) = base.utf8_text(code.as_bytes()) {
                base_classes.push(text.to_string());
            }
        }
    }

    let mut features = ClassFeatures {
        name,
        decorators,
        base_classes,
        docstring: None,
        fields: Vec::new(),
        methods: HashSet::new(),
        dunder_methods: HashSet::new(),
        properties: HashSet::new(),
        class_methods: HashSet::new(),
        static_methods: HashSet::new(),
        all_methods: Vec::new(),
        inner_classes: Vec::new(),
    };

    let Some(body) = class_node.child_by_field_name("body") else {
        return features;
    };

    let mut cursor = body.walk();
    for (index, stmt) in body.named_children(&mut cursor).enumerate() {
        match stmt.kind() {
            "expression_statement" => {
                if index == 0 {
                    if let Some(doc) = extract_docstring(stmt, code) {
                        features.docstring = Some(doc);
                        continue;
                    }
                }
                if let Some(field) = extract_field(stmt, code) {
                    features.fields.push(field);
                }
            }
            "function_definition" => {
                push_method(&mut features, build_method(stmt, code, &[]));
            }
            "decorated_definition" => {
                let decorators = collect_decorators(stmt, code);
                let inner = unwrap_decorated(stmt);
                match inner.kind() {
                    "function_definition" => {
                        push_method(&mut features, build_method(inner, code, &decorators));
                    }
                    "class_definition" => {
                        features
                            .inner_classes
                            .push(extract_from_node(inner, code, decorators));
                    }
                    _ => {}
                }
            }
            "class_definition" => {
                features
                    .inner_classes
                    .push(extract_from_node(stmt, code, Vec::new()));
            }
            _ => {}
        }
    }

    features
}

/// Docstring of a class body: a leading expression statement holding a
/// bare string. Lines past the first are dedented to the statement's
/// column so re-emission is a pure reindent.
fn extract_docstring(stmt: Node<'_>, code: &str) -> Option<String> {
    let expr = stmt.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    let raw = stmt.utf8_text(code.as_bytes()).ok()?;
    let base_col = stmt.start_position().column;
    let mut lines = raw.lines();
    let mut out = vec![lines.next()?.trim_end().to_string()];
    for line in lines {
        if line.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        let leading = line.len() - line.trim_start().len();
        let cut = leading.min(base_col);
        out.push(line[cut..].trim_end().to_string());
    }
    Some(out.join("\n"))
}

/// Classification priority: dunder, property, classmethod, staticmethod,
/// plain.
fn push_method(features: &mut ClassFeatures, method: ClassMethod) {
    let is_dunder = method.name.starts_with("__") && method.name.ends_with("__");
    let is_classmethod = method.decorators.iter().any(|d| d == "classmethod");
    let is_static = method.decorators.iter().any(|d| d == "staticmethod");

    features.all_methods.push(method.clone());
    if is_dunder {
        features.dunder_methods.insert(method);
    } else if method.is_property {
        features.properties.insert(method);
    } else if is_classmethod {
        features.class_methods.insert(method);
    } else if is_static {
        features.static_methods.insert(method);
    } else {
        features.methods.insert(method);
    }
}

fn collect_decorators(decorated: Node<'_>, code: &str) -> Vec<String> {
    let mut decorators = Vec::new();
    let mut cursor = decorated.walk();
    for child in decorated.named_children(&mut cursor) {
        if child.kind() == "decorator" {
            if let Ok(text) = child.utf8_text(code.as_bytes()) {
                decorators.push(text.trim_start_matches('@').to_string());
            }
        }
    }
    decorators
}

fn extract_field(stmt: Node<'_>, code: &str) -> Option<ClassField> {
    let assign = stmt.named_child(0)?;
    if assign.kind() != "assignment" {
        return None;
    }
    let left = assign.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    let name = left.utf8_text(code.as_bytes()).ok()?.to_string();
    let type_annotation = assign
        .child_by_field_name("type")
        .and_then(|n| n.utf8_text(code.as_bytes()).ok())
        .map(str::to_string);
    let default_value = assign
        .child_by_field_name("right")
        .and_then(|n| n.utf8_text(code.as_bytes()).ok())
        .map(str::to_string);
    Some(ClassField { name, type_annotation, default_value })
}

fn build_method(def: Node<'_>, code: &str, decorators: &[String]) -> ClassMethod {
    let name = node_name(def, code).unwrap_or_default().to_string();
    let params = def
        .child_by_field_name("parameters")
        .and_then(|n| n.utf8_text(code.as_bytes()).ok())
        .unwrap_or("()");
    let ret = def
        .child_by_field_name("return_type")
        .and_then(|n| n.utf8_text(code.as_bytes()).ok());
    let is_async = def.child(0).is_some_and(|c| c.kind() == "async");

    let mut signature = String::new();
    if is_async {
        signature.push_str("async ");
    }
    signature.push_str("def ");
    signature.push_str(&name);
    signature.push_str(params);
    if let Some(ret) = ret {
        signature.push_str(" -> ");
        signature.push_str(ret);
    }
    signature.push(':');

    let body = def
        .child_by_field_name("body")
        .map(|block| normalize_body(block, def, code))
        .unwrap_or_else(|| format!("{INDENT}pass"));

    let is_property = decorators
        .iter()
        .any(|d| d == "property" || d.ends_with(".setter") || d.ends_with(".deleter"));

    ClassMethod {
        name,
        signature,
        body,
        is_property,
        decorators: decorators.to_vec(),
    }
}

/// Dedent a method's block so its first level sits at 4 spaces, with
/// deeper levels keeping their relative offset. Blank lines become empty.
fn normalize_body(block: Node<'_>, def: Node<'_>, code: &str) -> String {
    let raw = match block.utf8_text(code.as_bytes()) {
        Ok(text) => text,
        Err(_) => return format!("{INDENT}pass"),
    };

    // `def f(self): pass` keeps its body on the definition line.
    if block.start_position().row == def.start_position().row {
        return format!("{INDENT}{}", raw.trim());
    }

    let base_col = block.start_position().column;
    let mut lines = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        if i == 0 {
            // First line of the span starts at the block's first token.
            lines.push(format!("{INDENT}{}", line.trim_end()));
            continue;
        }
        if line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let leading = line.len() - line.trim_start().len();
        let cut = leading.min(base_col);
        lines.push(format!("{INDENT}{}", &line[cut..]));
    }
    lines.join("\n")
}

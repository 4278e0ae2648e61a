//! Method replacement inside a class, for indentation-structured files.

use tracing::debug;

use crate::error::EditError;
use crate::format::{format_element, INDENT_UNIT};
use crate::locator::{find_class_block, find_element, ElementKind};
use crate::model::{OperationKind, PatchOperation, PatchResult, Target};
use crate::registry::Strategy;
use crate::strategies::indentation_family;

/// Replaces a named method in place, appends it to an existing class,
/// or synthesizes the enclosing class in an empty file.
pub struct MethodReplaceStrategy;

impl Strategy for MethodReplaceStrategy {
    fn name(&self) -> &'static str {
        "method_replace"
    }

    fn handles(&self, op: &PatchOperation) -> bool {
        op.kind == OperationKind::File
            && indentation_family(op)
            && matches!(op.target, Some(Target::Method { .. }))
    }

    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        let Some(Target::Method { class, name }) = &op.target else {
            return Err(EditError::Strategy("method target required".into()));
        };
        let source = result.current_content.clone();

        if source.trim().is_empty() {
            let method = format_element(&op.content, INDENT_UNIT, None);
            result.current_content = format!("class {class}:\n{method}\n");
            return Ok(());
        }

        if let Some(boundary) = find_element(&source, name, ElementKind::Method, Some(class)) {
            let formatted = format_element(&op.content, &boundary.indent, None);
            result.current_content = format!(
                "{}{formatted}{}",
                &source[..boundary.start],
                &source[boundary.end..]
            );
            return Ok(());
        }

        // Method absent: append at the end of the class body.
        let Some(block) = find_class_block(&source, class) else {
            return Err(EditError::Strategy(format!("class {class} not found")));
        };
        debug!(%class, method = %name, "method not found, appending to class");
        let method_indent = format!("{}{INDENT_UNIT}", block.indent);
        let formatted = format_element(&op.content, &method_indent, None);
        result.current_content = format!(
            "{}\n\n{formatted}{}",
            &source[..block.end],
            &source[block.end..]
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(source: &str, class: &str, name: &str, content: &str) -> Result<String, EditError> {
        let mut op =
            PatchOperation::file("demo.py", Some(format!("{class}.{name}")), content);
        op.target = Some(Target::Method {
            class: class.to_string(),
            name: name.to_string(),
        });
        let mut result = PatchResult::new("demo.py", source);
        MethodReplaceStrategy.apply(&op, &mut result)?;
        Ok(result.current_content)
    }

    const SOURCE: &str = "\
class Shape:
    def area(self):
        return 0

    def name(self):
        return \"shape\"
";

    #[test]
    fn test_replace_method_in_place() {
        let out = apply(SOURCE, "Shape", "area", "def area(self):\n    return 42").unwrap();
        assert!(out.contains("        return 42"));
        assert!(out.contains("def name"));
        assert!(!out.contains("return 0"));
    }

    #[test]
    fn test_append_missing_method() {
        let out = apply(SOURCE, "Shape", "perimeter", "def perimeter(self):\n    return 4").unwrap();
        assert!(out.contains("    def perimeter(self):\n        return 4"));
        let name = out.find("def name").unwrap();
        let perimeter = out.find("def perimeter").unwrap();
        assert!(name < perimeter);
    }

    #[test]
    fn test_empty_file_synthesizes_class() {
        let out = apply("", "Shape", "area", "def area(self):\n    return 1").unwrap();
        assert_eq!(out, "class Shape:\n    def area(self):\n        return 1\n");
    }

    #[test]
    fn test_missing_class_is_an_error() {
        let err = apply("x = 1\n", "Shape", "area", "def area(self): ...").unwrap_err();
        assert!(matches!(err, EditError::Strategy(_)));
    }

    #[test]
    fn test_decorated_method_replaced_with_decorators() {
        let source = "class A:\n    @property\n    def x(self):\n        return 1\n";
        let out = apply(source, "A", "x", "@property\ndef x(self):\n    return 2").unwrap();
        assert_eq!(out.matches("@property").count(), 1);
        assert!(out.contains("return 2"));
    }
}

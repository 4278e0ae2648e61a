//! Module-level function replacement for indentation-structured files.

use tracing::debug;

use crate::error::EditError;
use crate::format::format_element;
use crate::locator::{find_element, ElementKind};
use crate::model::{OperationKind, PatchOperation, PatchResult, Target};
use crate::registry::Strategy;
use crate::strategies::{append_top_level, indentation_family};

/// Replaces a named function in place, or appends it when absent.
pub struct FunctionReplaceStrategy;

impl Strategy for FunctionReplaceStrategy {
    fn name(&self) -> &'static str {
        "function_replace"
    }

    fn handles(&self, op: &PatchOperation) -> bool {
        op.kind == OperationKind::File
            && indentation_family(op)
            && matches!(op.target, Some(Target::Function { .. }))
    }

    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        let Some(Target::Function { name }) = &op.target else {
            return Err(EditError::Strategy("function target required".into()));
        };
        let source = result.current_content.clone();
        match find_element(&source, name, ElementKind::Function, None) {
            Some(boundary) => {
                let formatted = format_element(&op.content, &boundary.indent, None);
                result.current_content = format!(
                    "{}{formatted}{}",
                    &source[..boundary.start],
                    &source[boundary.end..]
                );
            }
            None => {
                debug!(function = %name, "not found, appending");
                let formatted = format_element(&op.content, "", None);
                result.current_content = append_top_level(&source, &formatted);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(source: &str, name: &str, content: &str) -> String {
        let mut op = PatchOperation::file("demo.py", Some(name.to_string()), content);
        op.target = Some(Target::Function {
            name: name.to_string(),
        });
        let mut result = PatchResult::new("demo.py", source);
        FunctionReplaceStrategy.apply(&op, &mut result).unwrap();
        result.current_content
    }

    #[test]
    fn test_replace_in_place() {
        let source = "def f():\n    return 1\n\n\ndef g():\n    return 2\n";
        let out = apply(source, "f", "def f():\n    return 10");
        assert!(out.contains("return 10"));
        assert!(!out.contains("return 1\n\n\ndef f"));
        assert!(out.contains("def g"));
    }

    #[test]
    fn test_append_when_missing() {
        let source = "def g():\n    return 2\n";
        let out = apply(source, "f", "def f():\n    return 1");
        assert!(out.ends_with("def f():\n    return 1\n"));
        assert!(out.contains("return 2\n\n\ndef f"));
    }

    #[test]
    fn test_append_to_empty_file() {
        let out = apply("", "f", "def f():\n    return 1");
        assert_eq!(out, "def f():\n    return 1\n");
    }

    #[test]
    fn test_replacement_is_idempotent() {
        let source = "def f():\n    return 1\n\n\ndef g():\n    return 2\n";
        let once = apply(source, "f", "def f():\n    return 10");
        let twice = apply(&once, "f", "def f():\n    return 10");
        assert_eq!(once, twice);
    }
}

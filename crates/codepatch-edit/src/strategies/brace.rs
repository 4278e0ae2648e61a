//! Element replacement for brace-delimited grammars.
//!
//! JavaScript and TypeScript elements are spliced at tree-sitter byte
//! ranges exactly as authored, with no reindentation; braces make the
//! block structure explicit, so the snippet's own layout is kept.

use codepatch_ast::JsParser;
use tracing::debug;

use crate::error::EditError;
use crate::model::{OperationKind, PatchOperation, PatchResult, Target};
use crate::registry::Strategy;
use crate::strategies::{append_top_level, brace_family};

/// Replaces functions, classes and methods in brace-delimited sources.
pub struct BraceElementStrategy;

impl Strategy for BraceElementStrategy {
    fn name(&self) -> &'static str {
        "brace_element"
    }

    fn handles(&self, op: &PatchOperation) -> bool {
        op.kind == OperationKind::File
            && brace_family(op)
            && matches!(
                op.target,
                Some(Target::Function { .. } | Target::Class { .. } | Target::Method { .. })
            )
    }

    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        let source = result.current_content.clone();
        let mut parser = JsParser::new()?;
        let range = match &op.target {
            Some(Target::Function { name }) => parser.find_function(&source, name),
            Some(Target::Class { name }) => parser.find_class(&source, name),
            Some(Target::Method { class, name }) => parser.find_method(&source, class, name),
            _ => return Err(EditError::Strategy("element target required".into())),
        };

        let snippet = op.content.trim();
        match range {
            Some(range) => {
                result.current_content = format!(
                    "{}{snippet}{}",
                    &source[..range.start],
                    &source[range.end..]
                );
            }
            None => {
                if let Some(Target::Method { class, .. }) = &op.target {
                    return Err(EditError::Strategy(format!(
                        "method not found in class {class}"
                    )));
                }
                debug!("element not found, appending");
                result.current_content = append_top_level(&source, snippet);
            }
        }
        Ok(())
    }
}

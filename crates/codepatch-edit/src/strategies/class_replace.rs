//! Plain class replacement, the fallback behind the smart merge.

use tracing::debug;

use crate::error::EditError;
use crate::format::format_element;
use crate::locator::find_class_block;
use crate::model::{OperationKind, PatchOperation, PatchResult, Target};
use crate::registry::Strategy;
use crate::strategies::{append_top_level, indentation_family};

/// Replaces a named class wholesale, or appends it when absent.
pub struct ClassReplaceStrategy;

impl Strategy for ClassReplaceStrategy {
    fn name(&self) -> &'static str {
        "class_replace"
    }

    fn handles(&self, op: &PatchOperation) -> bool {
        op.kind == OperationKind::File
            && indentation_family(op)
            && matches!(op.target, Some(Target::Class { .. }))
    }

    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        let Some(Target::Class { name }) = &op.target else {
            return Err(EditError::Strategy("class target required".into()));
        };
        let source = result.current_content.clone();
        match find_class_block(&source, name) {
            Some(block) => {
                let formatted = format_element(&op.content, &block.indent, None);
                result.current_content = format!(
                    "{}{formatted}{}",
                    &source[..block.start],
                    &source[block.end..]
                );
            }
            None => {
                debug!(class = %name, "not found, appending");
                let formatted = format_element(&op.content, "", None);
                result.current_content = append_top_level(&source, &formatted);
            }
        }
        Ok(())
    }
}

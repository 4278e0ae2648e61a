//! Whole-file replacement, the last resort for content operations.

use crate::error::EditError;
use crate::model::{OperationKind, PatchOperation, PatchResult, Target};
use crate::registry::Strategy;

/// Replaces the entire file with the operation content.
pub struct WholeFileStrategy;

impl Strategy for WholeFileStrategy {
    fn name(&self) -> &'static str {
        "whole_file"
    }

    fn handles(&self, op: &PatchOperation) -> bool {
        op.kind == OperationKind::File
            && matches!(op.target, None | Some(Target::WholeFile))
    }

    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        let mut content = op.content.clone();
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        result.current_content = content;
        Ok(())
    }
}

//! Feature-merging class replacement.
//!
//! Runs ahead of the plain class replacement: instead of discarding
//! the original class body, extracts both feature sets and merges
//! them, so a partial snippet cannot silently drop methods.

use codepatch_ast::DiffThresholds;
use tracing::debug;

use crate::error::EditError;
use crate::format::format_element;
use crate::locator::find_class_block;
use crate::merge::merge_classes;
use crate::model::{OperationKind, PatchOperation, PatchResult, Target};
use crate::registry::Strategy;
use crate::strategies::{append_top_level, indentation_family};

/// Merges a replacement class into the existing definition.
#[derive(Default)]
pub struct SmartClassStrategy {
    thresholds: DiffThresholds,
}

impl SmartClassStrategy {
    /// A strategy with custom significance thresholds.
    #[must_use]
    pub fn with_thresholds(thresholds: DiffThresholds) -> Self {
        Self { thresholds }
    }
}

impl Strategy for SmartClassStrategy {
    fn name(&self) -> &'static str {
        "smart_class"
    }

    fn handles(&self, op: &PatchOperation) -> bool {
        // `mode=replace` opts out of merging and leaves the class to
        // the plain replacement strategy.
        op.kind == OperationKind::File
            && indentation_family(op)
            && matches!(op.target, Some(Target::Class { .. }))
            && op.attributes.get("mode").map_or(true, |m| m != "replace")
    }

    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        let Some(Target::Class { name }) = &op.target else {
            return Err(EditError::Strategy("class target required".into()));
        };
        let source = result.current_content.clone();

        let Some(block) = find_class_block(&source, name) else {
            debug!(class = %name, "not found, appending");
            let formatted = format_element(&op.content, "", None);
            result.current_content = append_top_level(&source, &formatted);
            return Ok(());
        };

        let outcome = merge_classes(&block.text, &op.content, &self.thresholds);
        if outcome.needs_confirmation {
            result.needs_review = true;
        }
        let formatted = format_element(&outcome.merged, &block.indent, None);
        result.current_content = format!(
            "{}{formatted}{}",
            &source[..block.start],
            &source[block.end..]
        );
        Ok(())
    }
}

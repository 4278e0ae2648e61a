//! File-level actions: move, delete, and method removal.

use tracing::debug;

use crate::error::EditError;
use crate::locator::{find_element, ElementKind};
use crate::model::{FileAction, OperationKind, PatchOperation, PatchResult};
use crate::registry::Strategy;

/// Applies `move_file`, `delete_file` and `delete_method` actions.
///
/// Content-wise a move and a delete are the same edit: the source file
/// is emptied. Writing the moved content at its destination is the
/// caller's side of the contract.
pub struct FileActionStrategy;

impl Strategy for FileActionStrategy {
    fn name(&self) -> &'static str {
        "file_action"
    }

    fn handles(&self, op: &PatchOperation) -> bool {
        op.kind == OperationKind::FileAction && op.action.is_some()
    }

    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        match op.action {
            Some(FileAction::MoveFile) => {
                let source = op.require_attr("source")?;
                let target = op.require_attr("target")?;
                debug!(%source, %target, "moving file");
                result.current_content = String::new();
                Ok(())
            }
            Some(FileAction::DeleteFile) => {
                let source = op.require_attr("source")?;
                debug!(%source, "deleting file");
                result.current_content = String::new();
                Ok(())
            }
            Some(FileAction::DeleteMethod) => {
                let class = op.require_attr("class")?;
                let method = op.require_attr("method")?;
                let source = result.current_content.clone();
                let Some(boundary) =
                    find_element(&source, method, ElementKind::Method, Some(class))
                else {
                    return Err(EditError::Strategy(format!(
                        "method {class}.{method} not found"
                    )));
                };
                debug!(%class, %method, "deleting method");
                let mut end = boundary.end;
                // Swallow the element's own newline and one separating
                // blank line so no hole is left behind.
                for _ in 0..2 {
                    if source[end..].starts_with('\n') {
                        end += 1;
                    }
                }
                result.current_content =
                    format!("{}{}", &source[..boundary.start], &source[end..]);
                Ok(())
            }
            None => Err(EditError::MissingAttribute("action")),
        }
    }
}

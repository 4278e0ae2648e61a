//! The built-in strategy set.
//!
//! Each strategy is a small, self-contained rewrite of file content;
//! ordering and fallback between them live in the registry.

mod brace;
mod class_replace;
mod file_ops;
mod function;
mod method;
mod smart_class;
mod whole_file;

pub use brace::BraceElementStrategy;
pub use class_replace::ClassReplaceStrategy;
pub use file_ops::FileActionStrategy;
pub use function::FunctionReplaceStrategy;
pub use method::MethodReplaceStrategy;
pub use smart_class::SmartClassStrategy;
pub use whole_file::WholeFileStrategy;

use codepatch_ast::Family;

use crate::model::PatchOperation;

/// Whether the operation edits an indentation-structured source file.
fn indentation_family(op: &PatchOperation) -> bool {
    op.lang.is_some_and(|l| l.family() == Family::Indentation)
}

/// Whether the operation edits a brace-delimited source file.
fn brace_family(op: &PatchOperation) -> bool {
    op.lang.is_some_and(|l| l.family() == Family::Brace)
}

/// Append `element` after the existing top-level code, separated by
/// two blank lines.
fn append_top_level(source: &str, element: &str) -> String {
    let trimmed = source.trim_end();
    if trimmed.is_empty() {
        format!("{}\n", element.trim_end())
    } else {
        format!("{trimmed}\n\n\n{}\n", element.trim_end())
    }
}

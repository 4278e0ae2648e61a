//! codepatch-edit - Strategy-driven application of code patch operations
//!
//! Takes parsed patch operations (replace a function, merge a class, move
//! a file) and applies them to file content through an ordered chain of
//! strategies with syntax validation and rollback between attempts.
//!
//! ## Architecture
//!
//! ```text
//! codepatch-edit/src/
//! ├── lib.rs        # Re-exports (entry point)
//! ├── error.rs      # EditError enum (thiserror)
//! ├── model.rs      # PatchOperation, PatchResult, Target
//! ├── target.rs     # Locator string -> Target resolution
//! ├── locator.rs    # Element boundary lookup (structural + pattern)
//! ├── format.rs     # Snippet reindentation
//! ├── merge.rs      # Class feature merge engine
//! ├── diff.rs       # Unified diff rendering (similar)
//! ├── registry.rs   # Strategy trait and priority-ordered registry
//! ├── pipeline.rs   # Per-file sequential processing
//! └── strategies/   # The built-in strategy set
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use codepatch_edit::{PatchOperation, Pipeline};
//!
//! let op = PatchOperation::file(
//!     "src/shapes.py",
//!     Some("Circle.area".into()),
//!     "def area(self):\n    return 3.14159 * self.r ** 2",
//! );
//! for result in Pipeline::default().run(vec![op]) {
//!     println!("{}", result.diff());
//! }
//! ```

mod diff;
mod error;
mod format;
mod locator;
mod merge;
mod model;
mod pipeline;
mod registry;
mod strategies;
mod target;

pub use diff::unified_diff;
pub use error::EditError;
pub use format::{format_element, split_decorators, INDENT_UNIT};
pub use locator::{
    find_class_block, find_element, find_element_with, ElementBoundary, ElementKind,
    LookupStrategy,
};
pub use merge::{merge_classes, MergeOutcome};
pub use model::{
    FileAction, OperationKind, PatchOperation, PatchResult, Target, TargetKind,
};
pub use pipeline::Pipeline;
pub use registry::{Strategy, StrategyRegistry};
pub use strategies::{
    BraceElementStrategy, ClassReplaceStrategy, FileActionStrategy, FunctionReplaceStrategy,
    MethodReplaceStrategy, SmartClassStrategy, WholeFileStrategy,
};
pub use target::resolve_target;

//! codepatch-ast - Structural parsing for the codepatch pipeline
//!
//! Tree-sitter backed element lookup, syntax validation and class feature
//! extraction for the two grammar families the pipeline edits:
//! indentation-significant (Python) and brace-delimited (JavaScript,
//! TypeScript).
//!
//! ## Architecture
//!
//! ```text
//! codepatch-ast/src/
//! ├── lib.rs          # Re-exports (entry point)
//! ├── error.rs        # AstError enum (thiserror)
//! ├── lang.rs         # Lang/Family enums and language detection
//! ├── python.rs       # Python element lookup (tree-sitter)
//! ├── javascript.rs   # Brace-family element lookup (tree-sitter)
//! ├── features.rs     # Class feature extraction
//! ├── class_diff.rs   # Feature diffing and significance heuristic
//! └── validate.rs     # Full-parse syntax validation
//! ```

mod class_diff;
mod error;
mod features;
mod javascript;
mod lang;
mod python;
mod validate;

pub use class_diff::{ClassDiff, DiffThresholds, diff_features};
pub use error::AstError;
pub use features::{ClassFeatures, ClassField, ClassMethod, extract_class_features};
pub use javascript::JsParser;
pub use lang::{Family, Lang};
pub use python::PythonParser;
pub use validate::{Validation, validate_syntax};

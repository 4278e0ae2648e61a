//! Core types for the edit pipeline.
//!
//! `PatchOperation` is produced by an external tag tokenizer and consumed
//! by the strategy pipeline; `PatchResult` accumulates the per-file
//! outcome. Both live for one run and are discarded afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use codepatch_ast::Lang;
use serde::Serialize;

use crate::diff::unified_diff;
use crate::error::EditError;

/// Which tag produced the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Content-bearing edit of a file or an element inside it.
    File,
    /// File-level action such as moving or deleting.
    FileAction,
}

/// Action carried by a `FileAction` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Empty the source file; the caller writes the target.
    MoveFile,
    /// Empty the source file.
    DeleteFile,
    /// Remove one method from a class.
    DeleteMethod,
}

impl FileAction {
    /// Parse the `action` attribute value.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "move_file" => Some(Self::MoveFile),
            "delete_file" => Some(Self::DeleteFile),
            "delete_method" => Some(Self::DeleteMethod),
            _ => None,
        }
    }
}

/// Closed set of target shapes a strategy can declare capability for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The whole file.
    WholeFile,
    /// A named free function.
    Function,
    /// A named class.
    Class,
    /// A named method inside a named class.
    Method,
}

/// Resolved edit target, derived from the operation's locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Replace the entire file content.
    WholeFile,
    /// A named free function.
    Function {
        /// Function name.
        name: String,
    },
    /// A named class.
    Class {
        /// Class name.
        name: String,
    },
    /// A named method inside a class.
    Method {
        /// Enclosing class name.
        class: String,
        /// Method name.
        name: String,
    },
}

impl Target {
    /// The kind of this target.
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::WholeFile => TargetKind::WholeFile,
            Self::Function { .. } => TargetKind::Function,
            Self::Class { .. } => TargetKind::Class,
            Self::Method { .. } => TargetKind::Method,
        }
    }
}

/// A single code modification request.
#[derive(Debug, Clone)]
pub struct PatchOperation {
    /// Which tag produced the operation.
    pub kind: OperationKind,
    /// Path of the file the operation applies to.
    pub path: PathBuf,
    /// Raw element locator (`Class.method`, bare name, or absent).
    pub xpath: Option<String>,
    /// Replacement content.
    pub content: String,
    /// Action for `FileAction` operations.
    pub action: Option<FileAction>,
    /// Free-form tag attributes (`source`, `target`, `class`, `method`, `mode`).
    pub attributes: HashMap<String, String>,
    /// Language detected from the path.
    pub lang: Option<Lang>,
    /// Target resolved from `xpath`, filled in by the pipeline.
    pub target: Option<Target>,
    /// Names of strategies that ran this operation to completion.
    pub applied_strategies: Vec<String>,
    /// Errors recorded while processing; append-only.
    pub errors: Vec<String>,
}

impl PatchOperation {
    /// A `FILE` operation replacing the whole file or an element in it.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>, xpath: Option<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let lang = Lang::from_path(&path);
        Self {
            kind: OperationKind::File,
            path,
            xpath,
            content: content.into(),
            action: None,
            attributes: HashMap::new(),
            lang,
            target: None,
            applied_strategies: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// An `OPERATION` tag carrying a file action.
    #[must_use]
    pub fn file_action(
        path: impl Into<PathBuf>,
        action: FileAction,
        attributes: HashMap<String, String>,
    ) -> Self {
        let path = path.into();
        let lang = Lang::from_path(&path);
        Self {
            kind: OperationKind::FileAction,
            path,
            xpath: None,
            content: String::new(),
            action: Some(action),
            attributes,
            lang,
            target: None,
            applied_strategies: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Fetch a required attribute.
    ///
    /// # Errors
    /// `EditError::MissingAttribute` when the attribute is absent.
    pub fn require_attr(&self, name: &'static str) -> Result<&str, EditError> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .ok_or(EditError::MissingAttribute(name))
    }

    /// Record an error on the operation.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Whether any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record the strategy that completed this operation.
    pub fn record_strategy(&mut self, name: &str) {
        self.applied_strategies.push(name.to_string());
    }
}

/// Per-file outcome of a pipeline run.
///
/// `original_content` never changes after creation; `current_content` is
/// a complete file between operations, never a fragment.
#[derive(Debug, Clone, Serialize)]
pub struct PatchResult {
    /// File path.
    pub path: PathBuf,
    /// Content at first reference (empty when the file was unreadable).
    pub original_content: String,
    /// Content after the operations applied so far.
    pub current_content: String,
    /// Names of the strategies that committed changes, in order.
    pub applied_strategies: Vec<String>,
    /// Set when a class merge needs human confirmation before writing.
    pub needs_review: bool,
    /// Errors accumulated across this file's operations.
    pub errors: Vec<String>,
}

impl PatchResult {
    /// Create a result whose current content starts at the original.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, original_content: impl Into<String>) -> Self {
        let original_content = original_content.into();
        Self {
            path: path.into(),
            current_content: original_content.clone(),
            original_content,
            applied_strategies: Vec::new(),
            needs_review: false,
            errors: Vec::new(),
        }
    }

    /// Record an error on the result.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Whether any error was recorded. A file with unresolved errors must
    /// not be treated as ready to write.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Unified diff from original to current content.
    #[must_use]
    pub fn diff(&self) -> String {
        unified_diff(&self.original_content, &self.current_content)
    }

    /// The path as a borrowed `Path`.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

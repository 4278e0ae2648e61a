//! Error types for edit operations.
//!
//! Every variant is operation-scoped: the pipeline records the message on
//! the failing operation and carries on. Nothing here aborts a run.

use thiserror::Error;

/// Error types for the editing pipeline.
#[derive(Error, Debug)]
pub enum EditError {
    /// A required operation attribute is absent.
    #[error("missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    /// The operation's locator could not be interpreted.
    #[error("invalid target locator: {0}")]
    InvalidTarget(String),

    /// Source or candidate content failed to parse.
    #[error("parse error: {0}")]
    Parse(String),

    /// The operation names a language no strategy covers.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A strategy failed in a way specific to its algorithm.
    #[error("strategy error: {0}")]
    Strategy(String),
}

impl From<codepatch_ast::AstError> for EditError {
    fn from(e: codepatch_ast::AstError) -> Self {
        Self::Parse(e.to_string())
    }
}

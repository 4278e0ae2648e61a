//! Error types for parsing and feature extraction.

use thiserror::Error;

/// Error types for AST operations.
#[derive(Error, Debug)]
pub enum AstError {
    /// The grammar could not be loaded into the parser.
    #[error("grammar error: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree for the given source.
    #[error("failed to parse source")]
    Parse,

    /// A class snippet was expected but no class definition was found.
    #[error("no class definition found in snippet")]
    MissingClass,
}

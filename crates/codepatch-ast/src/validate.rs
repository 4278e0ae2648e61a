//! Syntax validation of candidate file content.
//!
//! A candidate is valid when a full parse yields no error or missing
//! nodes. Languages without a trustworthy grammar are reported as
//! unchecked rather than valid, so callers can tell "passed" from
//! "skipped".

use tracing::debug;

use crate::javascript::JsParser;
use crate::lang::Lang;
use crate::python::PythonParser;

/// Outcome of validating candidate content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The content parses cleanly.
    Valid,
    /// The content fails to parse; the message names the first bad line.
    Invalid(String),
    /// No grammar is registered for this language; the strategy's output
    /// is trusted as-is.
    Unchecked,
}

impl Validation {
    /// Whether the outcome permits committing the content.
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

/// Validate `code` as a complete file in `lang`.
#[must_use]
pub fn validate_syntax(lang: Lang, code: &str) -> Validation {
    if !lang.validates_syntax() {
        return Validation::Unchecked;
    }
    match lang {
        Lang::Python => match PythonParser::new() {
            Ok(mut parser) => match parser.first_error_line(code) {
                None => Validation::Valid,
                Some(line) => {
                    debug!(line, "candidate content failed python parse");
                    Validation::Invalid(format!("syntax error near line {line}"))
                }
            },
            Err(e) => Validation::Invalid(e.to_string()),
        },
        Lang::JavaScript => match JsParser::new() {
            Ok(mut parser) => {
                if parser.is_valid(code) {
                    Validation::Valid
                } else {
                    Validation::Invalid("syntax error in candidate output".to_string())
                }
            }
            Err(e) => Validation::Invalid(e.to_string()),
        },
        Lang::TypeScript => Validation::Unchecked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_python() {
        assert_eq!(validate_syntax(Lang::Python, "def f():\n    return 1\n"), Validation::Valid);
    }

    #[test]
    fn test_invalid_python_names_line() {
        let v = validate_syntax(Lang::Python, "x = 1\ndef broken(:\n");
        match v {
            Validation::Invalid(msg) => assert!(msg.contains("line")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_typescript_is_unchecked() {
        assert_eq!(
            validate_syntax(Lang::TypeScript, "const x: number = 1;"),
            Validation::Unchecked
        );
    }

    #[test]
    fn test_invalid_javascript() {
        assert!(!validate_syntax(Lang::JavaScript, "function broken( {").is_acceptable());
    }
}

//! Language support for structural patching.
//!
//! Provides a `Lang` enum covering the two grammar families the edit
//! pipeline understands, with automatic detection from file extensions.

use std::path::Path;

use anyhow::{Result, bail};

/// Structural grammar family of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Block structure is carried by indentation (Python).
    Indentation,
    /// Block structure is carried by braces (JavaScript, TypeScript).
    Brace,
}

/// Languages the pipeline can locate elements in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    /// Python
    Python,
    /// JavaScript
    JavaScript,
    /// TypeScript
    TypeScript,
}

impl Lang {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
        }
    }

    /// Grammar family of this language.
    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Self::Python => Family::Indentation,
            Self::JavaScript | Self::TypeScript => Family::Brace,
        }
    }

    /// Whether candidate output in this language can be syntax-checked
    /// with a registered grammar. Languages without one skip validation
    /// and trust the producing strategy.
    #[must_use]
    pub fn validates_syntax(&self) -> bool {
        match self {
            Self::Python | Self::JavaScript => true,
            // TypeScript is parsed best-effort with the JavaScript grammar,
            // which rejects valid annotated code, so it is never used to
            // veto a strategy's output.
            Self::TypeScript => false,
        }
    }

    /// Try to detect language from file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::from_extension(&ext)
    }

    /// Try to detect language from an extension string.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Self::Python),
            "js" | "jsx" | "mjs" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// File extensions for this language.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py"],
            Self::JavaScript => &["js", "jsx", "mjs"],
            Self::TypeScript => &["ts", "tsx"],
        }
    }
}

impl TryFrom<&str> for Lang {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "py" | "python" => Ok(Self::Python),
            "js" | "jsx" | "mjs" | "javascript" => Ok(Self::JavaScript),
            "ts" | "tsx" | "typescript" => Ok(Self::TypeScript),
            _ => bail!("Unsupported language: {}", s),
        }
    }
}

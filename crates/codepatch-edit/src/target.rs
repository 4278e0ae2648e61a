//! Target resolution from operation locators.
//!
//! A locator is either `Class.method` (dotted, always a method target)
//! or a bare identifier, which is disambiguated by looking at what the
//! replacement content declares: a `class <name>` declaration makes it
//! a class target, a matching `def` makes it a function target.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EditError;
use crate::model::Target;

#[allow(clippy::unwrap_used)]
static DOTTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)$").unwrap());

#[allow(clippy::unwrap_used)]
static BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

#[allow(clippy::unwrap_used)]
static CLASS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

#[allow(clippy::unwrap_used)]
static DEF_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Resolve a locator string into a concrete [`Target`].
///
/// `content` is the replacement snippet; for bare locators it decides
/// whether the name refers to a class or a function.
pub fn resolve_target(xpath: &str, content: &str) -> Result<Target, EditError> {
    if let Some(caps) = DOTTED.captures(xpath) {
        return Ok(Target::Method {
            class: caps[1].to_string(),
            name: caps[2].to_string(),
        });
    }

    if BARE.is_match(xpath) {
        let name = xpath.to_string();
        if declares_class(content, xpath) {
            return Ok(Target::Class { name });
        }
        if declares_function(content, xpath) {
            return Ok(Target::Function { name });
        }
        if CLASS_DECL.is_match(content) {
            // Content declares some class under a different name; treat
            // the locator as the class being replaced.
            return Ok(Target::Class { name });
        }
        return Ok(Target::Function { name });
    }

    Err(EditError::InvalidTarget(xpath.to_string()))
}

fn declares_class(content: &str, name: &str) -> bool {
    CLASS_DECL.captures_iter(content).any(|c| &c[1] == name)
}

fn declares_function(content: &str, name: &str) -> bool {
    DEF_DECL.captures_iter(content).any(|c| &c[1] == name)
}

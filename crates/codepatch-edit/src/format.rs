//! Reindentation of replacement snippets.
//!
//! Callers author replacement elements at whatever indentation they like;
//! the formatter normalizes them to the insertion site: decorators and
//! the definition line at the base indent, the body re-based onto the
//! body indent with its internal relative indentation preserved.

/// One indentation step.
pub const INDENT_UNIT: &str = "    ";

/// Split leading decorator lines off a snippet.
///
/// Returns the decorator lines (trimmed, with their `@`) and the
/// remaining content starting at the definition line.
#[must_use]
pub fn split_decorators(snippet: &str) -> (Vec<String>, String) {
    let mut decorators = Vec::new();
    let mut rest_start = 0;
    let trimmed = snippet.trim();
    for line in trimmed.lines() {
        let stripped = line.trim();
        if stripped.starts_with('@') {
            decorators.push(stripped.to_string());
            rest_start += line.len() + 1;
        } else {
            break;
        }
    }
    let rest = if rest_start >= trimmed.len() {
        String::new()
    } else {
        trimmed[rest_start..].to_string()
    };
    (decorators, rest)
}

/// Reindent an element snippet to `base_indent`.
///
/// Decorators and the definition line get `base_indent`; body lines get
/// `body_indent` (default `base_indent` plus one step) plus whatever
/// indentation they carried beyond the body's common leading whitespace.
/// Blank lines become empty, never trailing whitespace. Formatting is
/// idempotent: formatting already-formatted output at the same indents
/// yields identical text.
#[must_use]
pub fn format_element(snippet: &str, base_indent: &str, body_indent: Option<&str>) -> String {
    let default_body = format!("{base_indent}{INDENT_UNIT}");
    let body_indent = body_indent.unwrap_or(&default_body);

    let (decorators, rest) = split_decorators(snippet);
    let mut out = Vec::new();
    for decorator in &decorators {
        out.push(format!("{base_indent}{decorator}"));
    }

    let mut lines = rest.lines();
    let Some(first) = lines.next() else {
        return out.join("\n");
    };
    out.push(format!("{base_indent}{}", first.trim()));

    let body: Vec<&str> = lines.collect();
    let common = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    for line in body {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            let leading = line.len() - line.trim_start().len();
            let cut = leading.min(common);
            out.push(format!("{body_indent}{}", line[cut..].trim_end()));
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_decorators() {
        let (decorators, rest) = split_decorators("@alpha\n@beta(1)\ndef f():\n    pass");
        assert_eq!(decorators, vec!["@alpha", "@beta(1)"]);
        assert!(rest.starts_with("def f()"));
    }

    #[test]
    fn test_no_decorators() {
        let (decorators, rest) = split_decorators("def f():\n    pass");
        assert!(decorators.is_empty());
        assert!(rest.starts_with("def f()"));
    }

    #[test]
    fn test_reindent_to_method_level() {
        let out = format_element("def bar(self):\n    return 1", INDENT_UNIT, None);
        assert_eq!(out, "    def bar(self):\n        return 1");
    }

    #[test]
    fn test_decorators_at_base_indent() {
        let out = format_element("@property\ndef area(self):\n    return 1", INDENT_UNIT, None);
        assert_eq!(
            out,
            "    @property\n    def area(self):\n        return 1"
        );
    }

    #[test]
    fn test_relative_indentation_preserved() {
        let snippet = "def f(x):\n    if x:\n        return 1\n    return 0";
        let out = format_element(snippet, "", None);
        assert_eq!(out, "def f(x):\n    if x:\n        return 1\n    return 0");
    }

    #[test]
    fn test_blank_lines_have_no_trailing_whitespace() {
        let snippet = "def f():\n    a = 1\n\n    return a";
        let out = format_element(snippet, INDENT_UNIT, None);
        let blank = out.lines().nth(2).unwrap();
        assert_eq!(blank, "");
    }

    #[test]
    fn test_idempotent() {
        let snippet = "@dec\ndef f(x):\n    if x:\n        return 1\n\n    return 0";
        let once = format_element(snippet, INDENT_UNIT, None);
        let twice = format_element(&once, INDENT_UNIT, None);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_over_indented_snippet_normalized() {
        let snippet = "        def f():\n                return 1";
        let out = format_element(snippet, "", None);
        assert_eq!(out, "def f():\n    return 1");
    }

    #[test]
    fn test_explicit_body_indent() {
        let out = format_element("def f():\n    return 1", "", Some("      "));
        assert_eq!(out, "def f():\n      return 1");
    }
}

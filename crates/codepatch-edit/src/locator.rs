//! Element boundary resolution for indentation-based sources.
//!
//! Two lookup strategies run in a fixed order: a structural pass over
//! the parse tree, then a regex-and-indentation fallback that survives
//! files too broken to parse. Both agree on the last-definition-wins
//! rule and both widen the boundary to cover decorators.

use codepatch_ast::PythonParser;
use regex::Regex;

/// What kind of element is being located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A module-level function.
    Function,
    /// A method inside a class.
    Method,
}

/// Which lookup pass to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Parse-tree walk.
    Structural,
    /// Regex match plus indentation walk.
    Pattern,
}

/// Byte boundaries of a located element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBoundary {
    /// Byte offset of the start of the first line, indentation
    /// included (the decorator line when present).
    pub start: usize,
    /// Byte offset one past the last character of the element.
    pub end: usize,
    /// The element text, exclusive of any trailing newline.
    pub text: String,
    /// Leading whitespace of the definition line.
    pub indent: String,
}

/// Locate `name` in `source`, trying the structural pass first and the
/// pattern pass second.
#[must_use]
pub fn find_element(
    source: &str,
    name: &str,
    kind: ElementKind,
    class: Option<&str>,
) -> Option<ElementBoundary> {
    find_element_with(LookupStrategy::Structural, source, name, kind, class)
        .or_else(|| find_element_with(LookupStrategy::Pattern, source, name, kind, class))
}

/// Locate `name` with a single lookup strategy.
#[must_use]
pub fn find_element_with(
    strategy: LookupStrategy,
    source: &str,
    name: &str,
    kind: ElementKind,
    class: Option<&str>,
) -> Option<ElementBoundary> {
    match strategy {
        LookupStrategy::Structural => structural_lookup(source, name, kind, class),
        LookupStrategy::Pattern => pattern_lookup(source, name, kind, class),
    }
}

fn structural_lookup(
    source: &str,
    name: &str,
    kind: ElementKind,
    class: Option<&str>,
) -> Option<ElementBoundary> {
    let mut parser = PythonParser::new().ok()?;
    let range = match kind {
        ElementKind::Function => parser.find_function(source, name)?,
        ElementKind::Method => parser.find_method(source, class?, name)?,
    };
    Some(boundary_from_range(source, range.start, range.end))
}

fn pattern_lookup(
    source: &str,
    name: &str,
    kind: ElementKind,
    class: Option<&str>,
) -> Option<ElementBoundary> {
    let (region_start, region_end, min_indent) = match kind {
        ElementKind::Function => (0, source.len(), None),
        ElementKind::Method => {
            let (start, end, class_indent) = class_region(source, class?)?;
            (start, end, Some(class_indent))
        }
    };
    let region = &source[region_start..region_end];

    let re = def_regex(name)?;
    // Later definitions shadow earlier ones, so keep the last match.
    let mut last = None;
    for caps in re.captures_iter(region) {
        let indent_len = caps.get(1).map_or(0, |m| m.len());
        if min_indent.is_some_and(|class_indent| indent_len <= class_indent) {
            continue;
        }
        last = Some(caps);
    }
    let caps = last?;
    let whole = caps.get(0)?;

    let def_start = region_start + whole.start();
    let sig_end = region_start + whole.end();
    let indent = caps.get(1).map_or("", |m| m.as_str()).to_string();

    let start = widen_to_decorators(source, def_start, &indent);
    let end = walk_body(source, sig_end, indent.len(), region_end);
    Some(boundary_with_indent(source, start, end, indent))
}

/// Locate a class definition block, structural pass first.
#[must_use]
pub fn find_class_block(source: &str, name: &str) -> Option<ElementBoundary> {
    if let Some(range) = PythonParser::new()
        .ok()
        .and_then(|mut p| p.find_class(source, name))
    {
        return Some(boundary_from_range(source, range.start, range.end));
    }
    let (start, end, _) = class_region(source, name)?;
    Some(boundary_from_range(source, start, end))
}

fn def_regex(name: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"(?m)^([ \t]*)(?:async[ \t]+)?def[ \t]+{}[ \t]*\([^)]*\)[ \t]*(?:->[^:\n]*)?:",
        regex::escape(name)
    ))
    .ok()
}

/// Byte span of the last `class <name>` block plus its definition line
/// indent, ending where the next statement at or below that indent
/// begins.
fn class_region(source: &str, class: &str) -> Option<(usize, usize, usize)> {
    let re = Regex::new(&format!(
        r"(?m)^([ \t]*)class[ \t]+{}\b",
        regex::escape(class)
    ))
    .ok()?;
    let caps = re.captures_iter(source).last()?;
    let whole = caps.get(0)?;
    let class_indent = caps.get(1).map_or(0, |m| m.len());

    let after_decl = match source[whole.start()..].find('\n') {
        Some(pos) => whole.start() + pos + 1,
        None => source.len(),
    };
    let mut end = source.len();
    let mut offset = after_decl;
    for line in source[after_decl..].split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if !trimmed.trim().is_empty() {
            let indent = trimmed.len() - trimmed.trim_start().len();
            if indent <= class_indent {
                end = offset;
                break;
            }
        }
        offset += line.len();
    }
    Some((whole.start(), end, class_indent))
}

/// Extend `start` backward over contiguous decorator lines at the same
/// indent.
fn widen_to_decorators(source: &str, mut start: usize, indent: &str) -> usize {
    loop {
        let before = &source[..start];
        let Some(nl) = before.strip_suffix('\n') else {
            break;
        };
        let line_start = nl.rfind('\n').map_or(0, |p| p + 1);
        let line = &nl[line_start..];
        let same_indent = line.len() - line.trim_start().len() == indent.len();
        if same_indent && line.strip_prefix(indent).is_some_and(|rest| rest.starts_with('@')) {
            start = line_start;
        } else {
            break;
        }
    }
    start
}

/// Walk forward from the end of the signature line: blank lines and
/// lines indented deeper than the definition belong to the element.
/// Trailing blank lines are then excluded so a replace round-trips.
fn walk_body(source: &str, sig_end: usize, def_indent: usize, region_end: usize) -> usize {
    let line_end = match source[sig_end..region_end].find('\n') {
        Some(pos) => sig_end + pos + 1,
        None => return region_end,
    };
    let mut last_content = line_end;
    let mut offset = line_end;
    for line in source[line_end..region_end].split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.trim().is_empty() {
            offset += line.len();
            continue;
        }
        let indent = trimmed.len() - trimmed.trim_start().len();
        if indent <= def_indent {
            break;
        }
        offset += line.len();
        last_content = offset;
    }
    last_content
}

// Tree-sitter node spans start at the first token, after the line's
// indentation; widen to the line start so a splice never doubles the
// indent.
fn boundary_from_range(source: &str, start: usize, end: usize) -> ElementBoundary {
    let line_start = source[..start].rfind('\n').map_or(0, |p| p + 1);
    let line = &source[line_start..];
    let indent: String = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();
    boundary_with_indent(source, line_start, end, indent)
}

fn boundary_with_indent(
    source: &str,
    start: usize,
    end: usize,
    indent: String,
) -> ElementBoundary {
    let text = source[start..end].trim_end_matches('\n').to_string();
    let end = start + text.len();
    ElementBoundary {
        start,
        end,
        text,
        indent,
    }
}

//! Class feature merging.
//!
//! Given the original class text and a replacement snippet, extract
//! both feature sets, diff them, and emit a merged class. Two shapes
//! of replacement are recognized: a fields-only update (no methods in
//! the new snippet) keeps every original method, and an additive
//! update lays down the new class and retains original methods the
//! snippet does not redefine. Class decorators, the docstring and
//! inner classes carry over from the original when the snippet omits
//! them.

use std::collections::HashSet;

use codepatch_ast::{diff_features, extract_class_features, ClassFeatures, ClassMethod, DiffThresholds};
use tracing::debug;

use crate::format::INDENT_UNIT;

/// Result of merging a replacement class into the original.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged class text.
    pub merged: String,
    /// Whether the diff pattern warrants a human look.
    pub needs_confirmation: bool,
}

/// Merge `new` into `original`, both complete class definitions.
///
/// When either side fails feature extraction the new snippet is passed
/// through untouched.
#[must_use]
pub fn merge_classes(original: &str, new: &str, thresholds: &DiffThresholds) -> MergeOutcome {
    let (Ok(old_features), Ok(new_features)) = (
        extract_class_features(original),
        extract_class_features(new),
    ) else {
        debug!("feature extraction failed, passing replacement through");
        return MergeOutcome {
            merged: new.trim_end().to_string(),
            needs_confirmation: false,
        };
    };

    let diff = diff_features(&old_features, &new_features, *thresholds);
    debug!(
        class = %new_features.name,
        added = diff.added_methods.len(),
        removed = diff.removed_methods.len(),
        significant = diff.has_significant_changes,
        "merging class"
    );

    let merged = merge_features(&old_features, &new_features);
    let mut out = Vec::new();
    render_class(&merged, "", &mut out);

    MergeOutcome {
        merged: finish(out),
        needs_confirmation: diff.has_significant_changes,
    }
}

/// Combine the two feature sets. The new side wins wherever it says
/// something; the old side fills in what the snippet left out.
fn merge_features(old: &ClassFeatures, new: &ClassFeatures) -> ClassFeatures {
    let mut merged = new.clone();

    if merged.decorators.is_empty() {
        merged.decorators = old.decorators.clone();
    }
    if merged.docstring.is_none() {
        merged.docstring = old.docstring.clone();
    }

    if new.all_methods.is_empty() && !old.all_methods.is_empty() {
        // Fields-only update: every original method survives.
        merged.all_methods = old.all_methods.clone();
    } else {
        let new_names = new.method_names();
        for method in &old.all_methods {
            if !new_names.contains(method.name.as_str()) {
                merged.all_methods.push(method.clone());
            }
        }
    }

    let new_inner: HashSet<&str> = new.inner_classes.iter().map(|c| c.name.as_str()).collect();
    for inner in &old.inner_classes {
        if !new_inner.contains(inner.name.as_str()) {
            merged.inner_classes.push(inner.clone());
        }
    }

    merged
}

/// Emit one class at `indent`, recursing into inner classes one
/// indentation level deeper. A class whose body ends up empty gets a
/// `pass` statement so the output still parses.
fn render_class(class: &ClassFeatures, indent: &str, out: &mut Vec<String>) {
    for decorator in &class.decorators {
        out.push(format!("{indent}@{decorator}"));
    }
    out.push(format!("{indent}{}", class.declaration()));

    let body_indent = format!("{indent}{INDENT_UNIT}");
    let mut has_body = false;

    if let Some(doc) = &class.docstring {
        for line in doc.lines() {
            push_indented(out, &body_indent, line);
        }
        has_body = true;
    }
    if !class.fields.is_empty() {
        if has_body {
            out.push(String::new());
        }
        for field in &class.fields {
            out.push(format!("{body_indent}{}", field.render()));
        }
        has_body = true;
    }
    for inner in &class.inner_classes {
        if has_body {
            out.push(String::new());
        }
        render_class(inner, &body_indent, out);
        has_body = true;
    }
    for method in &class.all_methods {
        if has_body {
            out.push(String::new());
        }
        emit_method(out, method, &body_indent);
        has_body = true;
    }

    if !has_body {
        out.push(format!("{body_indent}pass"));
    }
}

fn emit_method(out: &mut Vec<String>, method: &ClassMethod, indent: &str) {
    for decorator in &method.decorators {
        out.push(format!("{indent}@{decorator}"));
    }
    out.push(format!("{indent}{}", method.signature));
    for line in method.body.lines() {
        push_indented(out, indent, line);
    }
}

fn push_indented(out: &mut Vec<String>, indent: &str, line: &str) {
    if line.trim().is_empty() {
        out.push(String::new());
    } else {
        out.push(format!("{indent}{line}"));
    }
}

fn finish(out: Vec<String>) -> String {
    let mut text = out.join("\n");
    while text.ends_with('\n') {
        text.pop();
    }
    text
}

//! Diffing of two class feature sets.
//!
//! Fields and plain methods are matched by name; a modification is
//! recorded when the member's shape changed under the same name. The
//! "significant change" flag marks outcomes that look like unintentional
//! data loss and should be confirmed before writing.

use std::collections::{HashMap, HashSet};

use crate::features::{ClassField, ClassFeatures, ClassMethod};

/// Tunable thresholds for the significance heuristic.
///
/// The constants are heuristic, carried over from field experience rather
/// than derived: a snippet that drops every method while touching only a
/// couple of fields is most likely incomplete, not an intentional purge.
#[derive(Debug, Clone, Copy)]
pub struct DiffThresholds {
    /// Total method removal counts as significant when fewer than this
    /// many fields were added or modified alongside it.
    pub trivial_field_changes: usize,
}

impl Default for DiffThresholds {
    fn default() -> Self {
        Self { trivial_field_changes: 3 }
    }
}

/// Difference between two versions of a class.
#[derive(Debug, Clone, Default)]
pub struct ClassDiff {
    /// Fields present only in the new version.
    pub added_fields: HashSet<ClassField>,
    /// Fields present only in the old version.
    pub removed_fields: HashSet<ClassField>,
    /// Fields present in both with a changed annotation or default.
    pub modified_fields: Vec<(ClassField, ClassField)>,
    /// Plain methods present only in the new version.
    pub added_methods: HashSet<ClassMethod>,
    /// Plain methods present only in the old version.
    pub removed_methods: HashSet<ClassMethod>,
    /// Plain methods present in both with a changed shape.
    pub modified_methods: Vec<(ClassMethod, ClassMethod)>,
    /// Whether the change pattern warrants external confirmation.
    pub has_significant_changes: bool,
}

/// Compare two class feature sets.
#[must_use]
pub fn diff_features(
    old: &ClassFeatures,
    new: &ClassFeatures,
    thresholds: DiffThresholds,
) -> ClassDiff {
    let old_fields: HashMap<&str, &ClassField> =
        old.fields.iter().map(|f| (f.name.as_str(), f)).collect();
    let new_fields: HashMap<&str, &ClassField> =
        new.fields.iter().map(|f| (f.name.as_str(), f)).collect();

    let added_fields: HashSet<ClassField> = new_fields
        .iter()
        .filter(|(name, _)| !old_fields.contains_key(*name))
        .map(|(_, f)| (*f).clone())
        .collect();
    let removed_fields: HashSet<ClassField> = old_fields
        .iter()
        .filter(|(name, _)| !new_fields.contains_key(*name))
        .map(|(_, f)| (*f).clone())
        .collect();
    let mut modified_fields = Vec::new();
    for (name, old_field) in &old_fields {
        if let Some(new_field) = new_fields.get(name) {
            if old_field.differs_from(new_field) {
                modified_fields.push(((*old_field).clone(), (*new_field).clone()));
            }
        }
    }

    let old_methods: HashMap<&str, &ClassMethod> =
        old.methods.iter().map(|m| (m.name.as_str(), m)).collect();
    let new_methods: HashMap<&str, &ClassMethod> =
        new.methods.iter().map(|m| (m.name.as_str(), m)).collect();

    let added_methods: HashSet<ClassMethod> = new_methods
        .iter()
        .filter(|(name, _)| !old_methods.contains_key(*name))
        .map(|(_, m)| (*m).clone())
        .collect();
    let removed_methods: HashSet<ClassMethod> = old_methods
        .iter()
        .filter(|(name, _)| !new_methods.contains_key(*name))
        .map(|(_, m)| (*m).clone())
        .collect();
    let mut modified_methods = Vec::new();
    for (name, old_method) in &old_methods {
        if let Some(new_method) = new_methods.get(name) {
            if old_method.differs_from(new_method) {
                modified_methods.push(((*old_method).clone(), (*new_method).clone()));
            }
        }
    }

    let mut has_significant_changes = false;
    let field_churn = added_fields.len() + modified_fields.len();

    // Every original method dropped while barely touching fields: a strong
    // signal of an incomplete snippet rather than an intentional purge.
    if !old_methods.is_empty()
        && removed_methods.len() == old_methods.len()
        && field_churn < thresholds.trivial_field_changes
    {
        has_significant_changes = true;
    }

    // Partial removal is ambiguous either way.
    if !removed_methods.is_empty() && removed_methods.len() < old_methods.len() {
        has_significant_changes = true;
    }

    ClassDiff {
        added_fields,
        removed_fields,
        modified_fields,
        added_methods,
        removed_methods,
        modified_methods,
        has_significant_changes,
    }
}

impl ClassDiff {
    /// Whether any field changed between the versions.
    #[must_use]
    pub fn has_field_changes(&self) -> bool {
        !self.added_fields.is_empty()
            || !self.removed_fields.is_empty()
            || !self.modified_fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_class_features;

    fn features(code: &str) -> ClassFeatures {
        extract_class_features(code).unwrap()
    }

    #[test]
    fn test_added_and_removed_methods() {
        let old = features("class C:\n    def a(self): pass\n    def b(self): pass\n");
        let new = features("class C:\n    def a(self): pass\n    def c(self): pass\n");
        let diff = diff_features(&old, &new, DiffThresholds::default());

        assert_eq!(diff.added_methods.len(), 1);
        assert_eq!(diff.removed_methods.len(), 1);
        assert!(diff.added_methods.iter().any(|m| m.name == "c"));
        assert!(diff.removed_methods.iter().any(|m| m.name == "b"));
    }

    #[test]
    fn test_modified_method_detected() {
        let old = features("class C:\n    def a(self):\n        return 1\n");
        let new = features("class C:\n    def a(self):\n        return 2\n");
        let diff = diff_features(&old, &new, DiffThresholds::default());
        assert_eq!(diff.modified_methods.len(), 1);
        assert!(diff.added_methods.is_empty());
        assert!(diff.removed_methods.is_empty());
    }

    #[test]
    fn test_partial_removal_is_significant() {
        let old = features("class C:\n    def a(self): pass\n    def b(self): pass\n");
        let new = features("class C:\n    def a(self): pass\n");
        let diff = diff_features(&old, &new, DiffThresholds::default());
        assert!(diff.has_significant_changes);
    }

    #[test]
    fn test_total_removal_with_one_field_change_is_significant() {
        let old = features("class C:\n    def a(self): pass\n    def b(self): pass\n");
        let new = features("class C:\n    x: int = 1\n");
        let diff = diff_features(&old, &new, DiffThresholds::default());
        assert!(diff.has_significant_changes);
    }

    #[test]
    fn test_total_removal_with_many_field_changes_is_not_significant() {
        let old = features("class C:\n    def a(self): pass\n");
        let new = features("class C:\n    x: int = 1\n    y: int = 2\n    z: int = 3\n");
        let diff = diff_features(&old, &new, DiffThresholds::default());
        assert!(!diff.has_significant_changes);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let old = features("class C:\n    def a(self): pass\n");
        let new = features("class C:\n    x: int = 1\n    y: int = 2\n    z: int = 3\n");
        let strict = DiffThresholds { trivial_field_changes: 5 };
        let diff = diff_features(&old, &new, strict);
        assert!(diff.has_significant_changes);
    }

    #[test]
    fn test_field_modification() {
        let old = features("class C:\n    x: int = 1\n    def a(self): pass\n");
        let new = features("class C:\n    x: int = 2\n    def a(self): pass\n");
        let diff = diff_features(&old, &new, DiffThresholds::default());
        assert_eq!(diff.modified_fields.len(), 1);
        assert!(diff.has_field_changes());
        assert!(!diff.has_significant_changes);
    }
}
